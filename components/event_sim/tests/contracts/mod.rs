//! Contract tests for event_sim
