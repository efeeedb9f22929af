//! Websocket subscription task

use futures_util::StreamExt;
use pulse_core::ChannelError;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::connection::ChannelKind;
use crate::session::Command;

/// Read one subscription until it closes
///
/// Reports `ChannelOpened`, every text frame, and exactly one
/// `ChannelClosed` (a failed connect counts as a close). Frames are passed
/// through undecoded.
pub async fn run_channel(
    channel: ChannelKind,
    url: Url,
    epoch: u64,
    commands: mpsc::UnboundedSender<Command>,
) {
    let closed = |reason: String| Command::ChannelClosed {
        channel,
        epoch,
        reason,
    };

    let mut stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            let error = ChannelError::Connect(e.to_string());
            tracing::warn!(%url, error = %error, "Channel connect failed");
            let _ = commands.send(closed(error.to_string()));
            return;
        }
    };

    tracing::debug!(%url, "Channel connected");
    if commands.send(Command::ChannelOpened { channel, epoch }).is_err() {
        return;
    }

    let reason = loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                let message = Command::ChannelMessage {
                    channel,
                    epoch,
                    text: text.as_str().to_owned(),
                };
                if commands.send(message).is_err() {
                    return;
                }
            }
            Some(Ok(Message::Close(frame))) => {
                break match frame {
                    Some(frame) => format!("closed by server (code {})", u16::from(frame.code)),
                    None => ChannelError::Closed.to_string(),
                };
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => break e.to_string(),
            None => break ChannelError::Closed.to_string(),
        }
    };

    let _ = commands.send(closed(reason));
}
