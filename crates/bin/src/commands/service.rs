//! Sync service lifecycle commands.

use sherry::service::ServiceHandle;
use sherry::{RegistryStore, Result};

pub async fn start(registry: &mut RegistryStore, force: bool) -> Result<()> {
    registry
        .run_command(async |reg| {
            let service = ServiceHandle::new(reg.dir());
            let pid = service.start(force)?;
            println!("Service started, PID: {pid}");
            Ok(())
        })
        .await
}

pub async fn stop(registry: &mut RegistryStore) -> Result<()> {
    registry
        .run_command(async |reg| {
            let service = ServiceHandle::new(reg.dir());
            service.stop()?;
            println!("Service stopped");
            Ok(())
        })
        .await
}
