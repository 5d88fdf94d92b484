//! Integration tests for refchain contexts, commands, and workflow files

mod cli_parse;
mod directory_context;
mod properties;
mod scenarios;
mod workflow_files;
