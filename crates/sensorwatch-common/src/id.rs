use snowflake::SnowflakeIdBucket;

/// Snowflake alert-ID source owned by a single engine.
///
/// IDs are unique per generator. Engines running side by side should be
/// given distinct `(machine_id, node_id)` pairs.
pub struct IdGenerator {
    machine_id: i32,
    node_id: i32,
    bucket: SnowflakeIdBucket,
}

impl IdGenerator {
    /// `machine_id` and `node_id` must each fit in 5 bits (0-31).
    pub fn new(machine_id: i32, node_id: i32) -> Self {
        Self {
            machine_id,
            node_id,
            bucket: SnowflakeIdBucket::new(machine_id, node_id),
        }
    }

    pub fn machine_id(&self) -> i32 {
        self.machine_id
    }

    pub fn node_id(&self) -> i32 {
        self.node_id
    }

    /// Next ID, in decimal string form.
    pub fn next_id(&mut self) -> String {
        self.bucket.get_id().to_string()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("machine_id", &self.machine_id)
            .field("node_id", &self.node_id)
            .finish()
    }
}

/// Extracts `(machine_id, node_id)` from a snowflake ID.
pub fn decode_origin(id: i64) -> (i32, i32) {
    (((id >> 17) & 0x1f) as i32, ((id >> 12) & 0x1f) as i32)
}
