#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    EmptyStepSequence,
    FirstStepNotAtZero(u32),
    NonIncreasingOffset { index: usize, offset_secs: u32 },
    DecreasingWater { index: usize, water_g: u32 },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::EmptyStepSequence => {
                write!(f, "Recipe has no steps")
            }
            DomainError::FirstStepNotAtZero(offset) => {
                write!(f, "First step must start at 0s, found {}s", offset)
            }
            DomainError::NonIncreasingOffset { index, offset_secs } => {
                write!(f, "Step {} offset {}s does not increase", index, offset_secs)
            }
            DomainError::DecreasingWater { index, water_g } => {
                write!(f, "Step {} water target {}g decreases", index, water_g)
            }
        }
    }
}

impl std::error::Error for DomainError {}

pub type DomainResult<T> = Result<T, DomainError>;
