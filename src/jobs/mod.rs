//! Batch jobs run by the `fetch` mode. The schedule itself lives in the
//! GitHub Actions workflow; a job here is one full pass over the output
//! files, safe to re-run at any time.

pub mod refresh_job;
