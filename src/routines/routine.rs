use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutineError {
    #[error("routine failed while {step}")]
    RoutineFailure { step: String },
}

impl RoutineError {
    pub fn while_doing<S: Into<String>>(step: S) -> Self {
        RoutineError::RoutineFailure { step: step.into() }
    }
}

#[async_trait::async_trait]
pub trait Routine: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> error_stack::Result<(), RoutineError>;
}
