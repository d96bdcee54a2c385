// Poetry corpus: poet/poem storage, listing, lookup, substring search, sample data.

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod seed;
pub mod store;
