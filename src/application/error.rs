//! Conversion of service failures into the single message a page shows.

use std::fmt;

use thiserror::Error;

use crate::application::api::ClientError;

const NO_RESPONSE: &str = "No response received from server. Please check your connection.";
const INVALID_POST_ID: &str = "Invalid post ID";

/// Page-level operations that surface a message on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPosts,
    LoadPost,
    CreatePost,
    UpdatePost,
    DeletePost,
    Search,
    Login,
    Signup,
    ForgotPassword,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListPosts => "list_posts",
            Operation::LoadPost => "load_post",
            Operation::CreatePost => "create_post",
            Operation::UpdatePost => "update_post",
            Operation::DeletePost => "delete_post",
            Operation::Search => "search",
            Operation::Login => "login",
            Operation::Signup => "signup",
            Operation::ForgotPassword => "forgot_password",
        }
    }

    /// User-facing message for `error` raised while performing this operation.
    pub fn failure_message(self, error: &ClientError) -> String {
        if let ClientError::InvalidInput(message) = error {
            return message.clone();
        }

        let message = match (self, error) {
            (Operation::ListPosts, ClientError::Decode(_)) => {
                "Unexpected data format received from server."
            }
            (Operation::ListPosts, _) => "Failed to fetch posts. Please try again later.",
            (
                Operation::LoadPost | Operation::UpdatePost | Operation::DeletePost,
                ClientError::InvalidId(_),
            ) => INVALID_POST_ID,
            (Operation::LoadPost, ClientError::NotFound) => "Post not found",
            (Operation::LoadPost, ClientError::Rejected { status: 404, .. }) => "Post not found",
            (Operation::LoadPost, ClientError::Rejected { status: 400, .. }) => INVALID_POST_ID,
            (Operation::LoadPost, ClientError::Transport(_)) => NO_RESPONSE,
            (Operation::LoadPost, _) => "Failed to load post. Please try again later.",
            (Operation::CreatePost, err) => {
                return err.service_message().map_or_else(
                    || {
                        "An error occurred while creating the post. Please try again.".to_string()
                    },
                    str::to_string,
                );
            }
            (Operation::UpdatePost, _) => "Failed to update the post. Please try again.",
            (Operation::DeletePost, _) => "Failed to delete post. Please try again later.",
            (Operation::Search, ClientError::Transport(_)) => NO_RESPONSE,
            (Operation::Search, _) => "Search failed. Please try again later.",
            (Operation::Login, _) => "Failed to login. Please try again.",
            (Operation::Signup, _) => "Failed to sign up. Please try again.",
            (Operation::ForgotPassword, _) => {
                "Failed to send password reset link. Please try again."
            }
        };
        message.to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed page operation: what was attempted, what to show, and why.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct OperationError {
    pub operation: Operation,
    pub message: String,
    #[source]
    pub source: ClientError,
}

impl OperationError {
    pub fn new(operation: Operation, source: ClientError) -> Self {
        let message = operation.failure_message(&source);
        Self {
            operation,
            message,
            source,
        }
    }
}

/// Shorthand for `map_err(|e| OperationError::new(op, e.into()))`.
pub trait OperationResultExt<T> {
    fn for_operation(self, operation: Operation) -> Result<T, OperationError>;
}

impl<T, E> OperationResultExt<T> for Result<T, E>
where
    E: Into<ClientError>,
{
    fn for_operation(self, operation: Operation) -> Result<T, OperationError> {
        self.map_err(|err| OperationError::new(operation, err.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_post_maps_statuses() {
        let op = Operation::LoadPost;
        assert_eq!(op.failure_message(&ClientError::NotFound), "Post not found");
        assert_eq!(
            op.failure_message(&ClientError::rejected(400, None)),
            "Invalid post ID"
        );
        assert_eq!(
            op.failure_message(&ClientError::Transport("refused".into())),
            NO_RESPONSE
        );
        assert_eq!(
            op.failure_message(&ClientError::rejected(500, None)),
            "Failed to load post. Please try again later."
        );
    }

    #[test]
    fn create_post_prefers_service_message() {
        let op = Operation::CreatePost;
        assert_eq!(
            op.failure_message(&ClientError::rejected(422, Some("Cover is required".into()))),
            "Cover is required"
        );
        assert_eq!(
            op.failure_message(&ClientError::rejected(500, None)),
            "An error occurred while creating the post. Please try again."
        );
    }

    #[test]
    fn local_validation_message_passes_through() {
        let err = OperationError::new(
            Operation::ForgotPassword,
            ClientError::InvalidInput("email address is not valid".into()),
        );
        assert_eq!(err.to_string(), "email address is not valid");
    }
}
