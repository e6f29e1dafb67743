//! Request body validation
//!
//! Turns an arbitrary decoded JSON value into a [`JobRequest`], or reports
//! every problem found in it. Only shape and type are checked here; time
//! ordering and file existence are left to the planner.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::model::{DirectTrack, JobRequest, TaggedJob, TaggedTrack, Timestamp};

/// A single problem in the request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value, e.g. `/tracks/2/endTime`
    pub path: String,
    pub problem: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.problem)
    }
}

/// Body rejected before any side effect
#[derive(Debug, Clone, Error)]
#[error("invalid request body ({} problem(s)): {}", .violations.len(), join(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

const MISSING: &str = "is required";
const NOT_STRING: &str = "must be a string";
const NOT_TIME: &str = "must be a string containing HH:MM:SS";
const NOT_OBJECT: &str = "must be an object";
const NOT_ARRAY: &str = "must be an array";
const NOT_SCALAR: &str = "must be a string, number or boolean";
const BAD_TAG_NAME: &str = "tag name must be non-empty and contain no '='";

/// JSON pointer reference token for `key`
fn pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[derive(Default)]
struct Collector {
    violations: Vec<Violation>,
}

impl Collector {
    fn push(&mut self, path: String, problem: &'static str) {
        self.violations.push(Violation { path, problem });
    }

    fn string(&mut self, obj: &Map<String, Value>, base: &str, key: &str) -> Option<String> {
        match obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.push(format!("{}/{}", base, key), NOT_STRING);
                None
            }
            None => {
                self.push(format!("{}/{}", base, key), MISSING);
                None
            }
        }
    }

    fn time(&mut self, obj: &Map<String, Value>, base: &str, key: &str) -> Option<Timestamp> {
        match obj.get(key) {
            Some(Value::String(s)) => {
                let found = Timestamp::find(s);
                if found.is_none() {
                    self.push(format!("{}/{}", base, key), NOT_TIME);
                }
                found
            }
            Some(_) => {
                self.push(format!("{}/{}", base, key), NOT_TIME);
                None
            }
            None => {
                self.push(format!("{}/{}", base, key), MISSING);
                None
            }
        }
    }

    fn metadata(&mut self, value: Option<&Value>) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        let obj = match value {
            None => return tags,
            Some(Value::Object(obj)) => obj,
            Some(_) => {
                self.push("/metadata".to_string(), NOT_OBJECT);
                return tags;
            }
        };
        for (key, value) in obj {
            if key.is_empty() || key.contains('=') {
                self.push(format!("/metadata/{}", pointer_token(key)), BAD_TAG_NAME);
                continue;
            }
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    self.push(format!("/metadata/{}", pointer_token(key)), NOT_SCALAR);
                    continue;
                }
            };
            tags.insert(key.clone(), text);
        }
        tags
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(v) if self.violations.is_empty() => Ok(v),
            _ => Err(ValidationError {
                violations: self.violations,
            }),
        }
    }
}

/// Validate a request body.
///
/// A body carrying a job-level `sourceFile` or `fileFormat` is read as a
/// tagged job, anything else as a direct job.
pub fn validate_job(body: &Value) -> Result<JobRequest, ValidationError> {
    let mut c = Collector::default();

    let Some(obj) = body.as_object() else {
        c.push(String::new(), NOT_OBJECT);
        return c.finish(None);
    };

    let tracks = match obj.get("tracks") {
        Some(Value::Array(items)) => Some(items.as_slice()),
        Some(_) => {
            c.push("/tracks".to_string(), NOT_ARRAY);
            None
        }
        None => {
            c.push("/tracks".to_string(), MISSING);
            None
        }
    };

    let job = if obj.contains_key("sourceFile") || obj.contains_key("fileFormat") {
        tagged_job(&mut c, obj, tracks)
    } else {
        tracks
            .and_then(|items| direct_tracks(&mut c, items))
            .map(JobRequest::Direct)
    };

    c.finish(job)
}

fn direct_tracks(c: &mut Collector, items: &[Value]) -> Option<Vec<DirectTrack>> {
    let mut tracks = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let base = format!("/tracks/{}", i);
        let Some(obj) = item.as_object() else {
            c.push(base, NOT_OBJECT);
            continue;
        };
        let to_file = c.string(obj, &base, "toFile");
        let from_file = c.string(obj, &base, "fromFile");
        let start = c.time(obj, &base, "startTime");
        let end = c.time(obj, &base, "endTime");
        if let (Some(to_file), Some(from_file), Some(start), Some(end)) =
            (to_file, from_file, start, end)
        {
            tracks.push(DirectTrack {
                from_file,
                to_file,
                start,
                end,
            });
        }
    }
    (tracks.len() == items.len()).then_some(tracks)
}

fn tagged_job(
    c: &mut Collector,
    obj: &Map<String, Value>,
    items: Option<&[Value]>,
) -> Option<JobRequest> {
    let source_file = c.string(obj, "", "sourceFile");
    let file_format = c.string(obj, "", "fileFormat");
    let metadata = c.metadata(obj.get("metadata"));

    let items = items?;
    let mut tracks = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let base = format!("/tracks/{}", i);
        let Some(track) = item.as_object() else {
            c.push(base, NOT_OBJECT);
            continue;
        };
        let name = c.string(track, &base, "name");
        let start = c.time(track, &base, "startTime");
        let end = c.time(track, &base, "endTime");
        if let (Some(name), Some(start), Some(end)) = (name, start, end) {
            tracks.push(TaggedTrack { name, start, end });
        }
    }

    Some(JobRequest::Tagged(TaggedJob {
        source_file: source_file?,
        file_format: file_format?,
        metadata,
        tracks,
    }))
}
