mod estimator;
mod replay;
mod service;
mod session;
