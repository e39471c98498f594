mod common;
mod verdict;
