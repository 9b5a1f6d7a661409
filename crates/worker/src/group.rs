//! Distributed group identity and synchronization
//!
//! The launcher starts this binary identically on every node and exports
//! the standard distributed environment (`RANK`, `WORLD_SIZE`,
//! `MASTER_ADDR`, `MASTER_PORT`). Rank 0 is the coordinator. Before
//! generation every rank meets at a TCP rendezvous barrier so no rank
//! starts producing tokens while another is still loading.

use shardchat_common::{Result, ShardChatError};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;
use tracing::{debug, warn};

pub const RANK_ENV: &str = "RANK";
pub const WORLD_SIZE_ENV: &str = "WORLD_SIZE";
pub const MASTER_ADDR_ENV: &str = "MASTER_ADDR";
pub const MASTER_PORT_ENV: &str = "MASTER_PORT";

const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// This process's identity within one distributed run
#[derive(Debug, Clone)]
pub struct DistributedGroup {
    rank: usize,
    size: usize,
    master_addr: String,
    master_port: u16,
}

impl DistributedGroup {
    /// Read identity from the launcher-provided environment.
    ///
    /// Absent rank variables mean a single-process run (rank 0 of 1), so
    /// the worker also runs standalone without a launcher.
    pub fn from_env() -> Result<Self> {
        let rank = parse_env(RANK_ENV)?.unwrap_or(0);
        let size = parse_env(WORLD_SIZE_ENV)?.unwrap_or(1);
        let master_addr =
            std::env::var(MASTER_ADDR_ENV).unwrap_or_else(|_| "127.0.0.1".to_string());
        let master_port = parse_env(MASTER_PORT_ENV)?.unwrap_or(29_500) as u16;

        Self::new(rank, size, master_addr, master_port)
    }

    pub fn new(rank: usize, size: usize, master_addr: String, master_port: u16) -> Result<Self> {
        if size == 0 || rank >= size {
            return Err(ShardChatError::invalid_input(format!(
                "invalid group identity: rank {} of {}",
                rank, size
            )));
        }
        Ok(Self {
            rank,
            size,
            master_addr,
            master_port,
        })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this is the coordinator (rank 0)
    pub fn is_coordinator(&self) -> bool {
        self.rank == 0
    }

    /// Block until every rank has arrived.
    ///
    /// The trivial collective: rank 0 accepts `size - 1` connections and
    /// releases them with a single byte once the last one is in. Like the
    /// generation run itself, the wait is unbounded.
    pub fn barrier(&self) -> Result<()> {
        if self.size <= 1 {
            return Ok(());
        }
        if self.rank == 0 {
            self.release_peers()
        } else {
            self.await_release()
        }
    }

    fn release_peers(&self) -> Result<()> {
        let listener = TcpListener::bind(("0.0.0.0", self.master_port))?;
        let mut peers = Vec::with_capacity(self.size - 1);

        while peers.len() < self.size - 1 {
            let (mut stream, addr) = listener.accept()?;
            let mut rank = [0u8; 1];
            stream.read_exact(&mut rank)?;
            debug!(rank = rank[0], peer = %addr, "rank arrived at barrier");
            peers.push(stream);
        }

        for mut stream in peers {
            stream.write_all(&[0])?;
        }
        debug!("barrier released");
        Ok(())
    }

    fn await_release(&self) -> Result<()> {
        let mut attempts: u32 = 0;
        let mut stream = loop {
            match TcpStream::connect((self.master_addr.as_str(), self.master_port)) {
                Ok(stream) => break stream,
                Err(e) => {
                    attempts += 1;
                    if attempts % 50 == 0 {
                        warn!(attempts, error = %e, "still waiting for coordinator rendezvous");
                    }
                    std::thread::sleep(CONNECT_RETRY_DELAY);
                }
            }
        };

        stream.write_all(&[self.rank.min(255) as u8])?;
        let mut release = [0u8; 1];
        stream.read_exact(&mut release)?;
        Ok(())
    }
}

fn parse_env(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|_| {
            ShardChatError::invalid_input(format!("invalid {} value: {}", name, value))
        }),
        Err(_) => Ok(None),
    }
}
