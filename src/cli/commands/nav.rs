use anyhow::Result;

use super::{Command, CommandContext};
use crate::session::{NavigationProfile, Role};

pub struct NavCommand {
    pub role: Role,
}

impl Command for NavCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let profile = NavigationProfile::for_role(self.role);
        if ctx.json {
            return ctx.print_json(&profile);
        }

        println!("🧭 {} dashboard ({})", self.role.display_name(), profile.dashboard_path);
        for item in &profile.items {
            println!("   {:<16} {}", item.title, item.path);
        }
        Ok(())
    }
}
