//! Python bindings
//!
//! The host keeps one `GameSession` object per game and forwards user actions
//! to it. Timestamps are unix milliseconds and default to the current time.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::sync::Arc;

use crate::achievement::AchievementInfo;
use crate::config::{Difficulty, TrainerConfig};
use crate::error::TrainerError;
use crate::progress::{record_and_save, JsonFileStore, RecordOutcome};
use crate::rules::Action;
use crate::trainer::{now_millis, Algorithm, GameSession, GameSummary, Trainer, Verdict};

// ============================================================================
// Cached Configuration
// ============================================================================

static CACHED_CONFIG: OnceCell<Arc<RwLock<TrainerConfig>>> = OnceCell::new();

fn cached_config() -> PyResult<Arc<RwLock<TrainerConfig>>> {
    CACHED_CONFIG
        .get()
        .cloned()
        .ok_or_else(|| PyRuntimeError::new_err("Config not initialized. Call init_config() first."))
}

fn parse_algorithm(name: &str) -> PyResult<Algorithm> {
    Ok(name.parse::<Algorithm>()?)
}

fn trainer_for(seed: Option<u64>) -> PyResult<Trainer> {
    let config = cached_config()?.read().clone();
    Ok(match seed {
        Some(seed) => Trainer::with_seed(config, seed),
        None => Trainer::new(config),
    })
}

fn achievements_to_list<'py>(
    py: Python<'py>,
    achievements: &[AchievementInfo],
) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for achievement in achievements {
        let dict = PyDict::new(py);
        dict.set_item("id", &achievement.id)?;
        dict.set_item("name", &achievement.name)?;
        dict.set_item("description", &achievement.description)?;
        list.append(dict)?;
    }
    Ok(list)
}

// ============================================================================
// Python Functions
// ============================================================================

/// Initialize the trainer configuration (call once at startup)
///
/// # Arguments
/// * `config_json` - JSON config document; `None` uses the built-in defaults
///
/// Calling it again replaces the cached config. Sessions already created keep
/// the scoring they were created with.
#[pyfunction]
#[pyo3(signature = (config_json=None))]
fn init_config(config_json: Option<&str>) -> PyResult<()> {
    let config = match config_json {
        Some(json) => TrainerConfig::from_json(json)?,
        None => TrainerConfig::default(),
    };

    if let Some(existing) = CACHED_CONFIG.get() {
        *existing.write() = config;
    } else {
        let _ = CACHED_CONFIG.set(Arc::new(RwLock::new(config)));
    }
    Ok(())
}

/// Check if config is initialized
#[pyfunction]
fn is_config_initialized() -> bool {
    CACHED_CONFIG.get().is_some()
}

/// Start a session with an explicit sequence size
#[pyfunction]
#[pyo3(signature = (algorithm, size, seed=None))]
fn new_session(algorithm: &str, size: usize, seed: Option<u64>) -> PyResult<PyGameSession> {
    let algorithm = parse_algorithm(algorithm)?;
    let inner = trainer_for(seed)?.new_session(algorithm, size)?;
    Ok(PyGameSession { inner })
}

/// Start a session sized by difficulty ("easy", "medium" or "hard")
#[pyfunction]
#[pyo3(signature = (algorithm, difficulty, seed=None))]
fn new_session_for_difficulty(
    algorithm: &str,
    difficulty: &str,
    seed: Option<u64>,
) -> PyResult<PyGameSession> {
    let algorithm = parse_algorithm(algorithm)?;
    let difficulty: Difficulty = difficulty.parse()?;
    let inner = trainer_for(seed)?.new_session_for(algorithm, difficulty)?;
    Ok(PyGameSession { inner })
}

/// Start a session over a host-provided sequence
#[pyfunction]
#[pyo3(signature = (algorithm, values, target_index=None, now=None))]
fn session_from_sequence(
    algorithm: &str,
    values: Vec<i64>,
    target_index: Option<usize>,
    now: Option<u64>,
) -> PyResult<PyGameSession> {
    let algorithm = parse_algorithm(algorithm)?;
    let scoring = cached_config()?.read().scoring;
    let inner = GameSession::from_sequence(
        algorithm,
        values,
        target_index,
        now.unwrap_or_else(now_millis),
    )?
    .with_scoring(scoring);
    Ok(PyGameSession { inner })
}

/// Record a finished game into a JSON profile directory
#[pyfunction]
fn record_game(store_dir: &str, uid: &str, summary_json: &str) -> PyResult<PyRecordOutcome> {
    let config = cached_config()?;
    let summary: GameSummary = serde_json::from_str(summary_json).map_err(TrainerError::from)?;
    let store = JsonFileStore::new(store_dir)?;
    let (profile, outcome) = record_and_save(&store, uid, &summary, &config.read())?;
    PyRecordOutcome::new(profile, outcome)
}

/// Record a finished game without blocking the event loop
///
/// # Returns
/// A Python awaitable that resolves to a RecordOutcome object
///
/// # Example (Python)
/// ```python
/// outcome = await record_game_async("profiles", "user_1", session.summary_json())
/// print(outcome.mastery_after)
/// ```
#[pyfunction]
fn record_game_async<'py>(
    py: Python<'py>,
    store_dir: String,
    uid: String,
    summary_json: String,
) -> PyResult<Bound<'py, PyAny>> {
    let config = cached_config()?;

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let outcome = tokio::task::spawn_blocking(move || {
            let summary: GameSummary =
                serde_json::from_str(&summary_json).map_err(TrainerError::from)?;
            let store = JsonFileStore::new(store_dir)?;
            let (profile, outcome) = record_and_save(&store, &uid, &summary, &config.read())?;
            PyRecordOutcome::new(profile, outcome)
        })
        .await
        .map_err(|e| PyRuntimeError::new_err(format!("Recording task panicked: {}", e)))??;

        Ok(outcome)
    })
}

/// Check a condition expression for syntax and unknown properties
#[pyfunction]
fn validate_condition(condition: &str) -> PyResult<()> {
    Ok(crate::condition::validate_condition(condition)?)
}

// ============================================================================
// GameSession
// ============================================================================

#[pyclass(name = "GameSession")]
pub struct PyGameSession {
    inner: GameSession,
}

#[pymethods]
impl PyGameSession {
    /// Apply one action and return the decision as a dict
    ///
    /// Keys: accepted, correct, terminal, reason, rejection, score,
    /// score_delta, status. Unknown action names raise ValueError.
    #[pyo3(signature = (action, value=None, now=None))]
    fn apply(
        &mut self,
        py: Python<'_>,
        action: &str,
        value: Option<isize>,
        now: Option<u64>,
    ) -> PyResult<Py<PyAny>> {
        let parsed = Action::parse(action, value)
            .ok_or_else(|| PyValueError::new_err(format!("Invalid action: {}", action)))?;
        let outcome = self.inner.apply(parsed, now.unwrap_or_else(now_millis));

        let dict = PyDict::new(py);
        dict.set_item("accepted", outcome.accepted())?;
        dict.set_item("correct", outcome.correct())?;
        dict.set_item("terminal", outcome.terminal())?;
        dict.set_item("reason", outcome.reason().map(|r| r.as_str()))?;
        dict.set_item(
            "rejection",
            match &outcome.verdict {
                Verdict::Rejected(r) => Some(r.to_string()),
                _ => None,
            },
        )?;
        dict.set_item("score", outcome.score)?;
        dict.set_item("score_delta", outcome.score_delta)?;
        dict.set_item("status", outcome.status.as_str())?;
        Ok(dict.into())
    }

    /// Canonical next action as `(name, value)`, or None once finished
    fn expected_action(&self) -> Option<(&'static str, Option<isize>)> {
        self.inner
            .expected_action()
            .map(|action| (action.name(), action.value()))
    }

    #[pyo3(signature = (now=None))]
    fn elapsed_seconds(&self, now: Option<u64>) -> u64 {
        self.inner.elapsed_seconds(now.unwrap_or_else(now_millis))
    }

    #[pyo3(signature = (now=None))]
    fn summary(&self, py: Python<'_>, now: Option<u64>) -> PyResult<Py<PyAny>> {
        let summary = self.inner.summary(now.unwrap_or_else(now_millis));
        let dict = PyDict::new(py);
        dict.set_item("algorithm", summary.algorithm.as_str())?;
        dict.set_item("status", summary.status.as_str())?;
        dict.set_item("score", summary.score)?;
        dict.set_item("elapsed_seconds", summary.elapsed_seconds)?;
        dict.set_item("correct_actions", summary.correct_actions)?;
        dict.set_item("incorrect_actions", summary.incorrect_actions)?;
        dict.set_item("accuracy", summary.accuracy_percent())?;
        dict.set_item("sequence_len", summary.sequence_len)?;
        Ok(dict.into())
    }

    /// Summary as JSON, the form `record_game` expects
    #[pyo3(signature = (now=None))]
    fn summary_json(&self, now: Option<u64>) -> PyResult<String> {
        let summary = self.inner.summary(now.unwrap_or_else(now_millis));
        Ok(serde_json::to_string(&summary).map_err(TrainerError::from)?)
    }

    /// Full session state, for hosts that persist sessions between requests
    fn to_json(&self) -> PyResult<String> {
        Ok(serde_json::to_string(&self.inner).map_err(TrainerError::from)?)
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let inner: GameSession = serde_json::from_str(json).map_err(TrainerError::from)?;
        Ok(Self { inner })
    }

    #[getter]
    fn algorithm(&self) -> &'static str {
        self.inner.algorithm().as_str()
    }

    #[getter]
    fn sequence(&self) -> Vec<i64> {
        self.inner.sequence().to_vec()
    }

    #[getter]
    fn score(&self) -> u32 {
        self.inner.score()
    }

    #[getter]
    fn status(&self) -> &'static str {
        self.inner.status().as_str()
    }

    #[getter]
    fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    #[getter]
    fn target_index(&self) -> Option<usize> {
        self.inner.target_index()
    }

    #[getter]
    fn correct_actions(&self) -> u32 {
        self.inner.stats().correct
    }

    #[getter]
    fn incorrect_actions(&self) -> u32 {
        self.inner.stats().incorrect
    }
}

// ============================================================================
// RecordOutcome
// ============================================================================

#[pyclass(name = "RecordOutcome")]
pub struct PyRecordOutcome {
    outcome: RecordOutcome,
    profile_json: String,
}

impl PyRecordOutcome {
    fn new(profile: crate::progress::UserProfile, outcome: RecordOutcome) -> PyResult<Self> {
        let profile_json = serde_json::to_string(&profile).map_err(TrainerError::from)?;
        Ok(Self {
            outcome,
            profile_json,
        })
    }
}

#[pymethods]
impl PyRecordOutcome {
    #[getter]
    fn algorithm(&self) -> &'static str {
        self.outcome.algorithm.as_str()
    }

    #[getter]
    fn mastery_before(&self) -> &'static str {
        self.outcome.mastery_before.as_str()
    }

    #[getter]
    fn mastery_after(&self) -> &'static str {
        self.outcome.mastery_after.as_str()
    }

    #[getter]
    fn mastery_changed(&self) -> bool {
        self.outcome.mastery_changed()
    }

    /// Updated profile document
    #[getter]
    fn profile_json(&self) -> &str {
        &self.profile_json
    }

    fn new_achievements(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(achievements_to_list(py, &self.outcome.new_achievements)?.into())
    }
}

// ============================================================================
// Python Module Definition
// ============================================================================

#[pymodule]
fn algo_trainer_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_config, m)?)?;
    m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(new_session, m)?)?;
    m.add_function(wrap_pyfunction!(new_session_for_difficulty, m)?)?;
    m.add_function(wrap_pyfunction!(session_from_sequence, m)?)?;
    m.add_function(wrap_pyfunction!(record_game, m)?)?;
    m.add_function(wrap_pyfunction!(record_game_async, m)?)?;
    m.add_function(wrap_pyfunction!(validate_condition, m)?)?;
    m.add_class::<PyGameSession>()?;
    m.add_class::<PyRecordOutcome>()?;
    Ok(())
}
