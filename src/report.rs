use tracing::error;

/// Log an error that is swallowed so that mounting can carry on.
pub(crate) fn report(tag: &str, err: &anyhow::Error) {
    error!("{tag} {err:#}");

    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_2(&tag.into(), &format!("{err:#}").into());
}
