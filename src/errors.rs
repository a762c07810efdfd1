use schema::PokemonType;
use thiserror::Error;

/// Main error type for the Pokemon battle simulator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleEngineError {
    /// Error raised while reading a roster file
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    /// Error related to invalid Pokemon construction data
    #[error("Pokemon data error: {0}")]
    PokemonData(#[from] PokemonDataError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
}

/// Errors raised while parsing a roster file
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The file did not contain exactly two trainer blocks
    #[error("expected 2 trainer blocks, found {0}")]
    TrainerCount(usize),
    /// A Pokemon line does not follow `Name (Key: Value, ...)`
    #[error("line {line}: malformed Pokemon line: {details}")]
    MalformedLine { line: usize, details: String },
    /// The `Type` field names no known type
    #[error("line {line}: invalid Pokemon type: {token}")]
    UnknownType { line: usize, token: String },
    /// A required field is absent for this type
    #[error("line {line}: missing field `{field}`")]
    MissingField { line: usize, field: &'static str },
    /// A field was given that this type does not accept, or given twice
    #[error("line {line}: unexpected field `{field}`")]
    UnexpectedField { line: usize, field: String },
    /// A numeric field could not be read
    #[error("line {line}: invalid value `{value}` for `{field}`")]
    InvalidNumber { line: usize, field: String, value: String },
    /// Stat values parsed but were rejected on construction
    #[error("line {line}: {source}")]
    InvalidPokemon { line: usize, source: PokemonDataError },
    /// A RON trainer template has an empty name
    #[error("trainer #{index}: name must not be empty")]
    UnnamedTrainer { index: usize },
    /// A RON Pokemon template was rejected on construction
    #[error("{trainer}'s Pokemon #{index}: {source}")]
    InvalidTemplate {
        trainer: String,
        index: usize,
        source: PokemonDataError,
    },
    /// RON template could not be decoded
    #[error("invalid RON roster: {0}")]
    Ron(String),
}

/// Errors related to Pokemon construction data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PokemonDataError {
    /// Names must be non-empty
    #[error("Pokemon name must be a non-empty string")]
    EmptyName,
    /// Level outside 0..=100
    #[error("level must be between 0 and 100, got {0}")]
    LevelOutOfRange(u32),
    /// Temperature or healing factor is negative or not finite
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidFactor { field: &'static str, value: f64 },
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// No active Pokemon found when one was expected
    #[error("No active Pokemon found for {0}")]
    NoActivePokemon(String),
    /// Invalid player index
    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),
    /// A type-specific action was requested from a Pokemon of another type
    #[error("{name} is a {actual} Pokemon, not {expected}")]
    WrongVariant {
        name: String,
        expected: PokemonType,
        actual: PokemonType,
    },
    /// The battle was already started
    #[error("The battle has already started")]
    AlreadyStarted,
    /// The battle already has a result
    #[error("The battle is already over")]
    BattleOver,
    /// The battle did not finish within the allowed number of rounds
    #[error("No winner after {0} rounds")]
    RoundLimitExceeded(u32),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ParseError
pub type ParseResult<T> = Result<T, ParseError>;
