pub mod inst;
pub mod op;
pub mod psudo;
pub mod reg;
