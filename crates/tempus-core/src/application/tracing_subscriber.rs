use crate::extension::TomlTableExt;
use std::{io, sync::OnceLock};
use toml::Table;
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::writer::MakeWriterExt,
    layer::SubscriberExt,
};

#[cfg(feature = "env-filter")]
use tracing_subscriber::filter::EnvFilter;

/// Initializes the global tracing subscriber with the `[tracing]` table of the config.
///
/// Supported keys are `format` (`pretty`, `json`, `compact` or `full`), `level`,
/// `filter` (requires the `env-filter` feature), `ansi`, `display-target`,
/// `display-filename`, `display-line-number`, `display-thread-ids`,
/// `display-thread-names`, `display-span-list` and `flatten-event`.
pub fn init_tracing(config: &Table) {
    if TRACING_INITIALIZED.set(()).is_err() {
        tracing::warn!("tracing subscriber has already been initialized");
        return;
    }

    let mut event_format = "full";
    let mut level_filter = LevelFilter::INFO;
    let mut stdout_max_level = Level::INFO;
    #[cfg(feature = "env-filter")]
    let mut env_filter = "info,tempus=debug,tempus_core=debug,tempus_axum=debug";

    let mut ansi_terminal = true;
    let mut display_target = true;
    let mut display_filename = false;
    let mut display_line_number = false;
    let mut display_thread_ids = false;
    let mut display_thread_names = false;
    let mut display_span_list = false;
    let mut flatten_event = false;
    if let Some(config) = config.get_table("tracing") {
        if let Some(format) = config.get_str("format") {
            event_format = format;
        }
        if let Some(level) = config.get_str("level") {
            match (level.parse::<Level>(), level.parse::<LevelFilter>()) {
                (Ok(level), Ok(filter)) => {
                    stdout_max_level = level;
                    level_filter = filter;
                }
                _ => tracing::warn!("invalid tracing level `{level}`"),
            }
        }
        #[cfg(feature = "env-filter")]
        if let Some(filter) = config.get_str("filter") {
            env_filter = filter;
        }
        ansi_terminal = config.get_bool("ansi").unwrap_or(true);
        display_target = config.get_bool("display-target").unwrap_or(true);
        display_filename = config.get_bool("display-filename").unwrap_or(false);
        display_line_number = config.get_bool("display-line-number").unwrap_or(false);
        display_thread_ids = config.get_bool("display-thread-ids").unwrap_or(false);
        display_thread_names = config.get_bool("display-thread-names").unwrap_or(false);
        display_span_list = config.get_bool("display-span-list").unwrap_or(false);
        flatten_event = config.get_bool("flatten-event").unwrap_or(false);
    }

    // Format layer
    let stdout = io::stdout.with_max_level(stdout_max_level);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(ansi_terminal)
        .with_target(display_target)
        .with_file(display_filename)
        .with_line_number(display_line_number)
        .with_thread_ids(display_thread_ids)
        .with_thread_names(display_thread_names)
        .with_writer(stdout);

    let subscriber = tracing_subscriber::registry();
    #[cfg(feature = "env-filter")]
    let subscriber = {
        let env_filter_layer = EnvFilter::builder()
            .with_default_directive(level_filter.into())
            .parse(env_filter)
            .unwrap_or_else(|err| {
                tracing::warn!("fail to parse the env filter `{env_filter}`: {err}");
                EnvFilter::default().add_directive(level_filter.into())
            });
        subscriber.with(env_filter_layer)
    };
    #[cfg(not(feature = "env-filter"))]
    let subscriber = subscriber.with(level_filter);
    match event_format {
        "compact" => {
            let subscriber = subscriber.with(fmt_layer.compact());
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!(
                    "fail to set the default subscriber with a `Compact` formatter: {err}"
                );
            }
        }
        "json" => {
            let json_fmt_layer = fmt_layer
                .json()
                .flatten_event(flatten_event)
                .with_current_span(true)
                .with_span_list(display_span_list);
            let subscriber = subscriber.with(json_fmt_layer);
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!("fail to set the default subscriber with a `Json` formatter: {err}");
            }
        }
        "pretty" => {
            let subscriber = subscriber.with(fmt_layer.pretty());
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!(
                    "fail to set the default subscriber with a `Pretty` formatter: {err}"
                );
            }
        }
        _ => {
            let subscriber = subscriber.with(fmt_layer);
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!("fail to set the default subscriber with a `Full` formatter: {err}");
            }
        }
    }
}

/// A flag to indicate whether the tracing subscriber has been initialized.
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();
