use bytes::Bytes;

/// One uploaded sound effect. Owned by the caller's session; effects may be
/// added and removed freely until generation starts.
#[derive(Debug, Clone)]
pub struct SoundEffect {
    pub id: String,
    pub name: String,
    /// User-entered label matched case-insensitively against script markers.
    pub marker: String,
    /// Raw audio payload as uploaded. Never decoded or mutated here.
    pub data: Bytes,
}

impl SoundEffect {
    pub fn new(name: impl Into<String>, marker: impl Into<String>, data: Bytes) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            marker: marker.into(),
            data,
        }
    }
}
