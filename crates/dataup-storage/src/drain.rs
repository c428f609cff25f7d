use tokio::io::AsyncRead;

/// Consume whatever is left of `reader` and discard it.
///
/// Used on upload failure paths so the input stream is always read to the end.
/// Errors while draining are logged and otherwise ignored: the caller is
/// already reporting the failure that made the drain necessary.
pub async fn drain_reader(reader: &mut (dyn AsyncRead + Send + Unpin)) {
    match tokio::io::copy(reader, &mut tokio::io::sink()).await {
        Ok(0) => {}
        Ok(drained) => tracing::debug!(drained_bytes = drained, "Drained unread upload bytes"),
        Err(e) => tracing::debug!(error = %e, "Upload stream ended while draining"),
    }
}
