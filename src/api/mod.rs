pub mod yahoo_api;
