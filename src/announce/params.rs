use crate::utils::hex::percent_encode_bytes;

/// Lifecycle event attached to an announce
///
/// Routine periodic announces carry no event at all (`Option::None` at the
/// use sites); there is deliberately no variant for that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceEvent {
    /// First announce of a torrent's loop
    Started,
    /// Final announce, sent exactly once when the loop shuts down
    Stopped,
}

impl AnnounceEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnounceEvent::Started => "started",
            AnnounceEvent::Stopped => "stopped",
        }
    }
}

/// Query parameters for one announce request
///
/// Upload/download counters are always zero here: nothing is transferred,
/// the tracker is only told the client is still seeding.
#[derive(Debug)]
pub struct AnnounceParams<'a> {
    pub info_hash: &'a [u8; 20],
    pub peer_id: &'a str,
    pub uploaded: u64,
    pub downloaded: u64,
    pub left: u64,
    pub compact: u8,
    pub port: u16,
    pub event: Option<AnnounceEvent>,
}

impl AnnounceParams<'_> {
    /// Render as a query string
    ///
    /// The info-hash is percent-encoded from its raw bytes. The peer id only
    /// ever contains unreserved characters, so it passes through as-is.
    pub fn to_query(&self) -> String {
        let mut query = format!(
            "info_hash={}&peer_id={}&uploaded={}&downloaded={}&left={}&compact={}&port={}",
            percent_encode_bytes(self.info_hash),
            self.peer_id,
            self.uploaded,
            self.downloaded,
            self.left,
            self.compact,
            self.port,
        );

        if let Some(event) = self.event {
            query.push_str("&event=");
            query.push_str(event.as_str());
        }

        query
    }
}
