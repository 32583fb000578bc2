use super::{CommandContext, print_json};
use crate::error::Result;
use crate::provision::StatusBoard;
use crate::wizard::{print_status, status_json, watch_status};
use std::time::Duration;

/// Poll interval in effect: the flag wins over the config, never below 1s
pub fn poll_interval(flag: Option<u64>, configured: u64) -> Duration {
    Duration::from_secs(flag.unwrap_or(configured).max(1))
}

pub async fn handle_status(
    ctx: &CommandContext,
    infra_id: u64,
    watch: bool,
    interval: Option<u64>,
) -> Result<()> {
    let project_id = ctx.require_project()?;

    let board = if watch {
        let interval = poll_interval(interval, ctx.config.status.poll_interval_secs);
        log::debug!("Watching infra {} every {:?}", infra_id, interval);
        watch_status(&ctx.client, project_id, infra_id, interval, !ctx.json).await?
    } else {
        let mut board = StatusBoard::new(infra_id);
        board.refresh(&ctx.client, project_id).await?;
        board
    };

    if ctx.json {
        print_json(&status_json(&board))
    } else {
        print_status(&board);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval() {
        assert_eq!(poll_interval(None, 5), Duration::from_secs(5));
        assert_eq!(poll_interval(Some(2), 5), Duration::from_secs(2));
        assert_eq!(poll_interval(Some(0), 5), Duration::from_secs(1));
    }
}
