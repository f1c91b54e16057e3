use clap::Subcommand;
use shoresafe_core::storage::Database;
use shoresafe_core::{PassLedger, PassType};
use uuid::Uuid;

use super::{print_json, CmdResult};
use crate::clock::Clock;

#[derive(Subcommand)]
pub enum PassAction {
    /// Issue a pass hosted by this device
    Create {
        /// solo_pass_7d or crew_pass_7d
        #[arg(long = "type")]
        pass_type: PassType,
        /// Host device id
        #[arg(long)]
        device: String,
        /// Receipt details to keep with the pass, as JSON
        #[arg(long)]
        purchase_info: Option<String>,
    },
    /// Join a crew pass with its share code
    Join {
        code: String,
        /// Guest device id
        #[arg(long)]
        device: String,
    },
    /// Show what a device is entitled to
    Entitlement {
        #[arg(long)]
        device: String,
        #[arg(long)]
        share_code: Option<String>,
        #[arg(long)]
        pass_id: Option<Uuid>,
    },
}

pub fn run(action: PassAction, clock: &Clock) -> CmdResult {
    let db = Database::open()?;
    let ledger = PassLedger::new(&db);
    let now = clock.now();

    match action {
        PassAction::Create {
            pass_type,
            device,
            purchase_info,
        } => {
            let purchase_info = purchase_info
                .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
                .transpose()?;
            let record = ledger.create_pass(pass_type, &device, purchase_info.as_ref(), now)?;
            print_json(&record)?;
        }
        PassAction::Join { code, device } => {
            print_json(&ledger.join_pass(&code, &device, now)?)?;
        }
        PassAction::Entitlement {
            device,
            share_code,
            pass_id,
        } => {
            let entitlement = ledger.entitlement(&device, share_code.as_deref(), pass_id, now)?;
            print_json(&serde_json::json!({
                "entitlement": entitlement,
                "tier": entitlement.tier(),
            }))?;
        }
    }

    Ok(())
}
