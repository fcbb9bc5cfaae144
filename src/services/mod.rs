pub mod scores_api;
