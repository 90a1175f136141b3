
mod github;
