use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    SlimsGraphError,
    assemblers::{
        EcephysSessionHandler, HistologySessionHandler, ImagingSessionHandler,
        InstrumentSessionHandler, ViralInjectionSessionHandler, WaterRestrictionSessionHandler,
    },
    config::{BackendKind, StoreConfig},
    models::{
        SlimsEcephysData, SlimsHistologyData, SlimsSpimData, SlimsViralInjectionData,
        SlimsWaterRestrictionData,
    },
    store::RecordStore,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub backend: String,
    pub database: Option<String>,
    pub snapshot: Option<String>,
    pub command: String,
    pub subject_id: Option<String>,
    pub session_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub input_id: Option<String>,
    pub partial_match: bool,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut config = Self {
            backend: String::from("memory"),
            command: String::from("status"),
            ..Self::default()
        };
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .map(|v| v.to_string())
                    .ok_or_else(|| format!("{flag} requires a value"))
            };
            match *arg {
                "--backend" => config.backend = value("--backend")?,
                "--db" | "--database" => config.database = Some(value("--db")?),
                "--snapshot" => config.snapshot = Some(value("--snapshot")?),
                "--command" => config.command = value("--command")?,
                "--subject-id" => config.subject_id = Some(value("--subject-id")?),
                "--session-name" => config.session_name = Some(value("--session-name")?),
                "--start-date" => config.start_date = Some(value("--start-date")?),
                "--end-date" => config.end_date = Some(value("--end-date")?),
                "--input-id" => config.input_id = Some(value("--input-id")?),
                "--partial-match" => config.partial_match = true,
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => {
                    config.command = arg.to_string();
                }
            }
        }
        Ok(config)
    }

    pub fn store_config(&self) -> Result<StoreConfig, SlimsGraphError> {
        let mut cfg = StoreConfig::new(BackendKind::parse(&self.backend)?);
        cfg.sqlite.path = self
            .database
            .as_deref()
            .filter(|db| *db != "memory")
            .map(PathBuf::from);
        cfg.snapshot = self.snapshot.as_deref().map(PathBuf::from);
        Ok(cfg)
    }

    pub fn help() -> &'static str {
        "Usage: slimsgraph [--backend memory|sqlite] [--db memory|PATH] [--snapshot FILE]\n\
         \x20                 [--command ecephys|histology|imaging|viral-injection|water-restriction|instrument|status]\n\
         \x20                 [--subject-id ID] [--session-name NAME] [--start-date ISO] [--end-date ISO]\n\
         \x20                 [--input-id NAME] [--partial-match]\n"
    }
}

/// Entry point for callers holding a store: one method per domain.
pub struct SlimsClient<S> {
    store: S,
}

impl<S> SlimsClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> SlimsClient<S>
where
    S: RecordStore,
{
    pub fn ecephys_sessions(
        &self,
        subject_id: Option<&str>,
        session_name: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsEcephysData>, SlimsGraphError> {
        EcephysSessionHandler::new(&self.store).get_ecephys_data(
            subject_id,
            session_name,
            start_date,
            end_date,
        )
    }

    pub fn histology(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsHistologyData>, SlimsGraphError> {
        HistologySessionHandler::new(&self.store).get_histology_data(
            subject_id, start_date, end_date,
        )
    }

    pub fn imaging(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsSpimData>, SlimsGraphError> {
        ImagingSessionHandler::new(&self.store).get_spim_data(subject_id, start_date, end_date)
    }

    pub fn viral_injections(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsViralInjectionData>, SlimsGraphError> {
        ViralInjectionSessionHandler::new(&self.store).get_viral_injection_data(
            subject_id, start_date, end_date,
        )
    }

    pub fn water_restrictions(
        &self,
        subject_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<SlimsWaterRestrictionData>, SlimsGraphError> {
        WaterRestrictionSessionHandler::new(&self.store).get_water_restriction_data(
            subject_id, start_date, end_date,
        )
    }

    pub fn instruments(
        &self,
        input_id: &str,
        partial_match: bool,
    ) -> Result<Vec<Value>, SlimsGraphError> {
        InstrumentSessionHandler::new(&self.store).get_instrument_data(input_id, partial_match)
    }

    /// Runs the command named in `config` and returns its JSON output.
    pub fn run(&self, config: &CommandLineConfig) -> Result<Value, SlimsGraphError> {
        let subject_id = config.subject_id.as_deref();
        let start = config.start_date.as_deref();
        let end = config.end_date.as_deref();
        match config.command.as_str() {
            "status" => Ok(json!({
                "status": "OK",
                "backend": config.backend,
                "service_version": env!("CARGO_PKG_VERSION"),
            })),
            "ecephys" => to_json(&self.ecephys_sessions(
                subject_id,
                config.session_name.as_deref(),
                start,
                end,
            )?),
            "histology" => to_json(&self.histology(subject_id, start, end)?),
            "imaging" => to_json(&self.imaging(subject_id, start, end)?),
            "viral-injection" => to_json(&self.viral_injections(subject_id, start, end)?),
            "water-restriction" => to_json(&self.water_restrictions(subject_id, start, end)?),
            "instrument" => {
                let input_id = config.input_id.as_deref().unwrap_or_default();
                to_json(&self.instruments(input_id, config.partial_match)?)
            }
            other => Err(SlimsGraphError::invalid_input(format!(
                "unknown command {other}"
            ))),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, SlimsGraphError> {
    serde_json::to_value(value).map_err(|e| SlimsGraphError::serialization(e.to_string()))
}
