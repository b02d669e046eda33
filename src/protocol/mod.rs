//! Wire protocol for the remote quiz API.

mod messages;

pub use messages::{
    AnswerRequest, AttemptPayload, ErrorBody, ListQuizzesResponse, StartAttemptResponse,
    SubmitRequest, SubmitResponse, SubmittedAnswer,
};
