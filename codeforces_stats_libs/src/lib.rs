pub mod cache;
pub mod codeforces;
pub mod pacer;
