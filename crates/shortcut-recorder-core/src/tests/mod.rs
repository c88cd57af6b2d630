mod capture;
mod chord;
mod committer;
mod support;
