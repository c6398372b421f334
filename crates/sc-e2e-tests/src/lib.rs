//! End-to-end tests for the support chat API live under `tests/`.
