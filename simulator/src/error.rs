//! Errors of the simulator. They turn into `std::io::Error` at the command line boundary.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("the transcriptome is empty")]
    EmptyTranscriptome,
    #[error("no expression data is loaded")]
    NoExpressionData,
    #[error("invalid expression: {0}")]
    InvalidExpression(String),
    #[error("transcript {0} appears more than once")]
    DuplicateTranscript(String),
    #[error("unknown transcript {0}")]
    UnknownTranscript(String),
    /// The two haplotypes do not share the transcript.
    #[error("transcript {name} is missing from haplotype {haplotype}")]
    MissingTranscript {
        name: String,
        haplotype: definitions::Haplotype,
    },
    #[error("rho of {name} should be in [0,1], but {rho}")]
    InvalidRho { name: String, rho: f64 },
    #[error("malformed variant at line {line}: {reason}")]
    MalformedVariant { line: usize, reason: String },
    #[error("variant {chrom}:{pos} is out of the chromosome (length {len})")]
    VariantOutOfRange { chrom: String, pos: u64, len: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;

impl From<SimulationError> for std::io::Error {
    fn from(why: SimulationError) -> Self {
        match why {
            SimulationError::Io(why) => why,
            why => std::io::Error::new(std::io::ErrorKind::InvalidData, why),
        }
    }
}
