use super::test_helpers::*;
use super::*;
use crate::types::{JobId, JobStatus};
use std::time::Duration;

mod submit;
