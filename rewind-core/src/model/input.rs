use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::foundation::error::{RewindError, RewindResult};

/// Greeting name used when `username` is absent.
pub const DEFAULT_USERNAME: &str = "User";
/// Skill shown when no tag is available.
pub const DEFAULT_SKILL: &str = "General";
/// Problem name shown when `topProblem` is absent.
pub const DEFAULT_TOP_PROBLEM: &str = "N/A";
/// Percentile assumed when `rankPercentile` is absent.
pub const DEFAULT_RANK_PERCENTILE: i64 = 100;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Per-user statistics consumed by the recap renderer.
///
/// Every field is optional: absent and `null` values fall back to the defaults exposed by the
/// accessor methods. Count fields accept integers, floats (rounded) and numeric strings.
/// Unknown fields are ignored.
pub struct RecapInput {
    /// Display name; may contain right-to-left script.
    pub username: Option<String>,
    /// Number of active days.
    #[serde(default, deserialize_with = "de_count")]
    pub days_active: Option<i64>,
    /// Number of solved problems.
    #[serde(default, deserialize_with = "de_count")]
    pub total_solved: Option<i64>,
    /// Longest daily streak.
    #[serde(default, deserialize_with = "de_count")]
    pub max_streak: Option<i64>,
    /// Share of users ranked above this one, in percent.
    #[serde(default, deserialize_with = "de_count")]
    pub rank_percentile: Option<i64>,
    /// Most practiced tags, most frequent first.
    pub top_tags: Option<Vec<TagEntry>>,
    /// Name of the most attempted problem.
    pub top_problem: Option<String>,
    /// Attempts made on [`RecapInput::top_problem`].
    #[serde(default, deserialize_with = "de_count")]
    pub top_problem_attempts: Option<i64>,
    /// Unlocked achievements in display order.
    pub achievements: Option<Vec<AchievementEntry>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
/// One entry of `topTags`.
pub struct TagEntry {
    /// Tag name as stored, e.g. `"two pointers"`.
    pub tag: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Value")]
/// One entry of `achievements`.
///
/// Parsing never fails: an entry that is not an object, or whose `image` is not a string, has no
/// image and ends up as a placeholder slot.
pub struct AchievementEntry {
    /// Icon path relative to the public asset directory, optionally with a leading `/`.
    pub image: Option<String>,
}

impl From<serde_json::Value> for AchievementEntry {
    fn from(value: serde_json::Value) -> Self {
        let image = value
            .get("image")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        Self { image }
    }
}

impl RecapInput {
    /// Parse a command-line argument: a path to an existing file, otherwise inline JSON text.
    pub fn from_arg(arg: &str) -> RewindResult<Self> {
        let path = Path::new(arg);
        if path.exists() {
            Self::from_path(path)
        } else {
            Self::from_json_str(arg)
        }
    }

    /// Read and parse a JSON document from `path`.
    pub fn from_path(path: &Path) -> RewindResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read recap input '{}'", path.display()))
            .map_err(|e| RewindError::input(format!("{e:#}")))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON document. The top level must be an object.
    pub fn from_json_str(text: &str) -> RewindResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| RewindError::input(format!("invalid JSON: {e}")))?;
        if !value.is_object() {
            return Err(RewindError::input("recap input must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| RewindError::input(e.to_string()))
    }

    /// Display name, `"User"` when absent.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USERNAME)
    }

    /// Active days, `0` when absent.
    pub fn days_active(&self) -> i64 {
        self.days_active.unwrap_or(0)
    }

    /// Solved problems, `0` when absent.
    pub fn total_solved(&self) -> i64 {
        self.total_solved.unwrap_or(0)
    }

    /// Longest streak, `0` when absent.
    pub fn max_streak(&self) -> i64 {
        self.max_streak.unwrap_or(0)
    }

    /// Rank percentile, `100` when absent.
    pub fn rank_percentile(&self) -> i64 {
        self.rank_percentile.unwrap_or(DEFAULT_RANK_PERCENTILE)
    }

    /// Share of users this user beats: `100 - rank_percentile`, saturating at the `i64` range.
    pub fn better_than_percent(&self) -> i64 {
        100i64.saturating_sub(self.rank_percentile())
    }

    /// Title-cased first tag, `"General"` when there is none.
    pub fn top_skill(&self) -> String {
        self.top_tags
            .as_deref()
            .and_then(|tags| tags.first())
            .and_then(|t| t.tag.as_deref())
            .map(title_case)
            .unwrap_or_else(|| DEFAULT_SKILL.to_string())
    }

    /// Most attempted problem, `"N/A"` when absent.
    pub fn top_problem(&self) -> &str {
        self.top_problem.as_deref().unwrap_or(DEFAULT_TOP_PROBLEM)
    }

    /// Attempts on the top problem, `0` when absent.
    pub fn top_problem_attempts(&self) -> i64 {
        self.top_problem_attempts.unwrap_or(0)
    }

    /// Achievements in display order; empty when absent.
    pub fn achievements(&self) -> &[AchievementEntry] {
        self.achievements.as_deref().unwrap_or(&[])
    }
}

/// Uppercase the first letter of every run of letters and lowercase the rest.
///
/// `"two pointers"` becomes `"Two Pointers"`, `"DP-on-trees"` becomes `"Dp-On-Trees"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn de_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        Float(f64),
        Text(String),
    }

    fn from_f64<E: serde::de::Error>(v: f64) -> Result<i64, E> {
        if !v.is_finite() || v.abs() > i64::MAX as f64 {
            return Err(E::custom(format!("count {v} is out of range")));
        }
        Ok(v.round() as i64)
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Int(v)) => Ok(Some(v)),
        Some(Repr::Float(v)) => from_f64(v).map(Some),
        Some(Repr::Text(s)) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                return Ok(Some(v));
            }
            let v = s
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got \"{s}\"")))?;
            from_f64(v).map(Some)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/input.rs"]
mod tests;
