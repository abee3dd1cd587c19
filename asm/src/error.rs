use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed statement: {0}")]
    MalformedStatement(String),

    #[error("Unknown mnemonic: `{0}`")]
    UnknownMnemonic(String),

    #[error("Unknown directive: `{0}`")]
    UnknownDirective(String),

    #[error("Invalid register: `{0}`")]
    InvalidRegister(String),

    #[error("Malformed expression: `{0}`")]
    MalformedExpression(String),

    #[error("Unresolved reference: `{0}`")]
    UnresolvedReference(String),

    #[error("Re-defined symbol: `{0}`")]
    DuplicateDefinition(String),

    #[error("Macro `{0}` is missing MEND")]
    UnterminatedMacro(String),

    #[error("MEND outside of a macro definition")]
    UnexpectedMend,

    #[error("Macro `{0}` expects {1} argument(s), got {2}")]
    MacroArity(String, usize, usize),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read line")]
    FileRead(#[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to serialize listing")]
    Listing(#[source] serde_yaml::Error),
}
