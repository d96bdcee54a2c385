pub mod poem;
pub mod poet;
pub mod user;
pub mod vocab;
