use crate::commands::{CmdCtx, Command};
use crate::error::{AppResult, SessionError};
use crate::hardening::CLOSE_DRAIN_MS;
use crate::input::{Keyword, parse_command_line};
use crate::net::codec::{FrameReader, write_json};
use crate::state::registry::Registry;
use crate::state::session::{ConnState, Session};
use coursereg_core::RegistrationForm;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Serves exactly one request on `stream`, then closes it.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, registry: Arc<Registry>) -> AppResult<()> {
    let (read_half, write_half) = stream.into_split();
    serve_exchange(read_half, write_half, peer, registry).await
}

/// Transport-agnostic body of [`handle_connection`].
pub async fn serve_exchange<R, W>(read_half: R, mut write_half: W, peer: SocketAddr, registry: Arc<Registry>) -> AppResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut sess = Session::new(peer);
    tracing::debug!(conn = %sess.id, %peer, "session opened");

    let cfg = registry.config.clone();
    let mut reader = FrameReader::new(BufReader::new(read_half), cfg.max_frame_bytes, cfg.read_timeout());

    let result = exchange(&mut sess, &mut reader, &mut write_half, registry).await;

    // Whatever happened, the connection does not outlive one exchange.
    let reached = sess.state();
    sess.transition(ConnState::Closed);
    if let Err(e) = write_half.shutdown().await {
        tracing::debug!(conn = %sess.id, error = %e, "shutdown failed");
    }
    drain(reader.into_inner()).await;

    tracing::debug!(conn = %sess.id, ?reached, elapsed = ?sess.started.elapsed(), "session closed");
    result
}

async fn exchange<R, W>(
    sess: &mut Session,
    reader: &mut FrameReader<BufReader<R>>,
    writer: &mut W,
    registry: Arc<Registry>,
) -> AppResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    sess.transition(ConnState::AwaitingCommandLine);

    let Some(line) = reader.next_line().await? else {
        tracing::debug!(conn = %sess.id, "peer left before sending a command");
        return Ok(());
    };

    let parsed = parse_command_line(&line);
    tracing::debug!(conn = %sess.id, cmd = %parsed.cmd, arg = %parsed.arg, "received command");

    let Some(keyword) = Keyword::parse(&parsed.cmd) else {
        // Unknown keywords get no reply at all; the client only sees the close.
        tracing::debug!(conn = %sess.id, cmd = %parsed.cmd, "ignoring unknown command");
        return Ok(());
    };

    if !registry.dispatcher.handles(keyword) {
        tracing::debug!(conn = %sess.id, %keyword, "no handler bound, ignoring command");
        return Ok(());
    }

    let command = match keyword {
        Keyword::Load => {
            sess.transition(ConnState::Loading);
            Command::Load(parsed.arg)
        }
        Keyword::Register => {
            sess.transition(ConnState::Registering);
            let form = reader.next_json::<RegistrationForm>().await?.ok_or(SessionError::MissingForm)?;
            Command::Register(form)
        }
    };

    let ctx = Arc::new(CmdCtx {
        registry: registry.clone(),
        conn_id: sess.id,
    });
    let replies = registry.dispatcher.dispatch(ctx, &command).await?;

    sess.transition(ConnState::Responding);
    for reply in &replies {
        write_json(&mut *writer, reply).await?;
    }

    Ok(())
}

/// Discards anything the client sent after its request so the socket closes
/// with a FIN instead of a reset. Bounded in time.
async fn drain<R: AsyncRead + Unpin>(mut reader: R) {
    let mut sink = tokio::io::sink();
    let discard = tokio::io::copy(&mut reader, &mut sink);
    let _ = tokio::time::timeout(Duration::from_millis(CLOSE_DRAIN_MS), discard).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Dispatcher;
    use crate::config::Config;
    use crate::commands::CommandError;
    use crate::net::codec::CodecError;
    use crate::store::{FileRegistrations, MemoryCatalog, MemoryRegistrations, RegistrationStore, StoreError};
    use tokio::io::AsyncReadExt;

    const FORM: &[u8] = b"INSCRIRE\n{\"firstName\":\"Ada\",\"lastName\":\"L\",\"email\":\"a@b.c\",\"matricule\":\"123456\",\"course\":{\"code\":\"IFT1015\",\"session\":\"Automne\"}}\n";

    fn test_config() -> Config {
        Config {
            read_timeout_secs: 1,
            max_frame_bytes: 256,
            ..Config::default()
        }
    }

    fn registry_with(regs: Arc<dyn RegistrationStore>, dispatcher: Dispatcher) -> Arc<Registry> {
        let catalog = Arc::new(MemoryCatalog::new("IFT1015\tIntro Programming\tAutomne\n"));
        Arc::new(Registry::with_stores(test_config(), catalog, regs, dispatcher))
    }

    fn registry(regs: Arc<MemoryRegistrations>) -> Arc<Registry> {
        registry_with(regs, Dispatcher::with_defaults())
    }

    async fn run(input: &'static [u8], registry: Arc<Registry>) -> (AppResult<()>, String) {
        let (server_out, mut client_in) = tokio::io::duplex(4096);
        let result = serve_exchange(input, server_out, "127.0.0.1:6000".parse().unwrap(), registry).await;

        let mut out = String::new();
        client_in.read_to_string(&mut out).await.unwrap();
        (result, out)
    }

    #[tokio::test]
    async fn load_replies_with_json_list() {
        let (res, out) = run(b"CHARGER Automne\n", registry(Arc::new(MemoryRegistrations::new()))).await;
        res.unwrap();
        assert_eq!(out, "[{\"code\":\"IFT1015\",\"title\":\"Intro Programming\",\"session\":\"Automne\"}]\n");
    }

    #[tokio::test]
    async fn only_first_command_is_served() {
        let (res, out) = run(
            b"CHARGER Hiver\nCHARGER Automne\n",
            registry(Arc::new(MemoryRegistrations::new())),
        )
        .await;
        res.unwrap();
        assert_eq!(out, "[]\n");
    }

    #[tokio::test]
    async fn register_reads_second_frame() {
        let regs = Arc::new(MemoryRegistrations::new());
        let (res, out) = run(FORM, registry(regs.clone())).await;
        res.unwrap();
        assert!(out.starts_with('"') && out.ends_with("\"\n"));
        assert!(out.contains("Ada") && out.contains("IFT1015"));
        assert_eq!(regs.records(), vec!["Automne\tIFT1015\t123456\tAda\tL\ta@b.c\n".to_string()]);
    }

    #[tokio::test]
    async fn unknown_command_closes_silently() {
        let (res, out) = run(b"SUPPRIMER IFT1015\n", registry(Arc::new(MemoryRegistrations::new()))).await;
        res.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn missing_form_is_an_error_without_reply() {
        let regs = Arc::new(MemoryRegistrations::new());
        let (res, out) = run(b"INSCRIRE\n", registry(regs.clone())).await;
        assert!(matches!(res, Err(SessionError::MissingForm)));
        assert!(out.is_empty());
        assert!(regs.records().is_empty());
    }

    #[tokio::test]
    async fn garbage_form_is_an_error_without_reply() {
        let (res, out) = run(b"INSCRIRE\n{not json}\n", registry(Arc::new(MemoryRegistrations::new()))).await;
        assert!(matches!(res, Err(SessionError::Codec(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn failed_append_closes_without_reply() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(FileRegistrations::new(dir.path().join("missing-dir").join("inscription.txt")));

        let (res, out) = run(FORM, registry_with(sink, Dispatcher::with_defaults())).await;
        assert!(matches!(
            res,
            Err(SessionError::Command(CommandError::Store(StoreError::Write { .. })))
        ));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn oversized_command_line_closes_without_reply() {
        let line = format!("CHARGER {}\n", "A".repeat(300));
        let input: &'static [u8] = Box::leak(line.into_bytes().into_boxed_slice());

        let (res, out) = run(input, registry(Arc::new(MemoryRegistrations::new()))).await;
        assert!(matches!(res, Err(SessionError::Codec(CodecError::FrameTooLarge { limit: 256 }))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn non_utf8_command_line_closes_without_reply() {
        let (res, out) = run(b"CHARGER \xff\xfe\n", registry(Arc::new(MemoryRegistrations::new()))).await;
        assert!(matches!(res, Err(SessionError::Codec(CodecError::Utf8(_)))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn unbound_keyword_does_not_wait_for_payload() {
        let regs = Arc::new(MemoryRegistrations::new());
        let mut d = Dispatcher::new();
        d.bind(Keyword::Load, Arc::new(crate::commands::Registrar));
        let registry = registry_with(regs.clone(), d);

        // The client never closes its side, so reading a form frame would hit the read timeout.
        let (mut client, server) = tokio::io::duplex(4096);
        let (read_half, write_half) = tokio::io::split(server);
        client.write_all(b"INSCRIRE\n").await.unwrap();

        let started = std::time::Instant::now();
        let res = serve_exchange(read_half, write_half, "127.0.0.1:6000".parse().unwrap(), registry).await;
        res.unwrap();
        assert!(started.elapsed() < Duration::from_millis(900));
        assert!(regs.records().is_empty());

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        assert!(out.is_empty());
    }
}
