use super::ant::Agent;

use shared::{AgentSnapshot, ModeCounts};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Key for agent slotmap.
    pub struct AgentKey;
}

/// The live agents of a run. Unordered; each agent is stored exactly once.
#[derive(Debug, Clone, Default)]
pub struct Colony {
    agents: SlotMap<AgentKey, Agent>,
}

impl Colony {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            agents: SlotMap::with_capacity_and_key(capacity),
        }
    }

    pub fn spawn(&mut self, agent: Agent) -> AgentKey {
        self.agents.insert(agent)
    }

    /// Drops every agent that has left the lattice. Returns how many were removed.
    pub fn retire_inactive(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(|_, agent| agent.active);
        before - self.agents.len()
    }

    pub fn get(&self, key: AgentKey) -> Option<&Agent> {
        self.agents.get(key)
    }

    pub fn get_mut(&mut self, key: AgentKey) -> Option<&mut Agent> {
        self.agents.get_mut(key)
    }

    pub fn contains(&self, key: AgentKey) -> bool {
        self.agents.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentKey, &Agent)> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AgentKey, &mut Agent)> {
        self.agents.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Explorers vs followers among the active agents.
    pub fn count_by_mode(&self) -> ModeCounts {
        let mut counts = ModeCounts::default();
        for agent in self.agents.values().filter(|a| a.active) {
            counts.record(agent.mode);
        }
        counts
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents.values().map(Agent::snapshot).collect()
    }
}
