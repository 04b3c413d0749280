//! Virtues command for almanack.
//!
//! Lists the catalog and any custom virtues, shows one virtue in full,
//! and adds or removes custom virtues. Custom virtues are a pro feature;
//! the gate lives here, never in the practice engine.

use serde::Serialize;

use crate::catalog;
use crate::cli::drain_writes;
use crate::config::Config;
use crate::core::PracticeEngine;
use crate::stats::{virtue_statistics, VirtueStats};

/// Options for the virtues command.
#[derive(Debug, Clone, Default)]
pub struct VirtuesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// What the virtues command should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtuesAction {
    /// List every virtue with practice counts.
    List,
    /// Show one virtue in full.
    Show {
        /// The virtue to show.
        virtue_id: String,
    },
    /// Add a custom virtue.
    Add {
        /// Display name.
        name: String,
        /// The precept, one sentence.
        description: String,
        /// Optional longer background text.
        context: Option<String>,
    },
    /// Remove a custom virtue.
    Remove {
        /// The virtue to remove.
        virtue_id: String,
    },
}

/// One virtue in the listing.
#[derive(Debug, Clone, Serialize)]
pub struct VirtueListing {
    /// Stable id.
    pub virtue_id: String,
    /// Display name.
    pub name: String,
    /// The precept.
    pub description: String,
    /// Whether this is a user-defined virtue.
    pub custom: bool,
    /// Completed weeks practicing this virtue.
    pub attempts: u32,
    /// Average faults across those weeks, absent when never practiced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_faults: Option<f64>,
    /// Whether this virtue is being practiced right now.
    pub active: bool,
    /// Whether this virtue is waiting in the queue.
    pub queued: bool,
}

/// Output format for the virtues command.
#[derive(Debug, Clone, Serialize)]
pub struct VirtuesOutput {
    /// Whether the action succeeded.
    pub success: bool,
    /// The virtues affected or listed.
    pub virtues: Vec<VirtueListing>,
    /// Id of a newly created custom virtue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<String>,
    /// Error message if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VirtuesOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            virtues: Vec::new(),
            created_id: None,
            error: Some(error.into()),
        }
    }
}

/// The virtues command implementation.
pub struct VirtuesCommand {
    engine: PracticeEngine,
    config: Config,
}

impl VirtuesCommand {
    /// Create a new virtues command.
    pub fn new(engine: PracticeEngine, config: Config) -> Self {
        Self { engine, config }
    }

    /// Run the virtues command.
    pub fn run(&mut self, action: &VirtuesAction, _options: &VirtuesOptions) -> VirtuesOutput {
        match action {
            VirtuesAction::List => VirtuesOutput {
                success: true,
                virtues: self.all_listings(),
                created_id: None,
                error: None,
            },
            VirtuesAction::Show { virtue_id } => match self.listing_for(virtue_id) {
                Some(listing) => VirtuesOutput {
                    success: true,
                    virtues: vec![listing],
                    created_id: None,
                    error: None,
                },
                None => VirtuesOutput::failure(format!("unknown virtue id '{}'", virtue_id)),
            },
            VirtuesAction::Add {
                name,
                description,
                context,
            } => self.add(name, description, context.as_deref()),
            VirtuesAction::Remove { virtue_id } => self.remove(virtue_id),
        }
    }

    fn add(&mut self, name: &str, description: &str, context: Option<&str>) -> VirtuesOutput {
        if !self.config.entitlement.pro {
            return VirtuesOutput::failure(
                "custom virtues require Almanack Pro; set pro = true under [entitlement] \
                in config.toml or ALMANACK_PRO=true",
            );
        }

        let id = self
            .engine
            .add_custom_virtue(name, description, context.unwrap_or_default())
            .id
            .clone();
        if let Some(error) = drain_writes(&self.engine) {
            return VirtuesOutput::failure(error);
        }

        let listing = self.listing_for(&id);
        VirtuesOutput {
            success: true,
            virtues: listing.into_iter().collect(),
            created_id: Some(id),
            error: None,
        }
    }

    fn remove(&mut self, virtue_id: &str) -> VirtuesOutput {
        if catalog::is_canonical(virtue_id) {
            return VirtuesOutput::failure("the thirteen catalog virtues cannot be removed");
        }
        if !self.engine.remove_custom_virtue(virtue_id) {
            return VirtuesOutput::failure(format!("unknown virtue id '{}'", virtue_id));
        }
        if let Some(error) = drain_writes(&self.engine) {
            return VirtuesOutput::failure(error);
        }

        VirtuesOutput {
            success: true,
            virtues: Vec::new(),
            created_id: None,
            error: None,
        }
    }

    fn all_listings(&self) -> Vec<VirtueListing> {
        let state = self.engine.state();
        let stats = virtue_statistics(&state.week_records);

        let mut listings: Vec<VirtueListing> = catalog::VIRTUES
            .iter()
            .map(|v| self.build_listing(v.id, v.name, v.description, false, &stats))
            .collect();
        for custom in &state.custom_virtues {
            listings.push(self.build_listing(
                &custom.id,
                &custom.name,
                &custom.description,
                true,
                &stats,
            ));
        }
        listings
    }

    fn listing_for(&self, virtue_id: &str) -> Option<VirtueListing> {
        let state = self.engine.state();
        let stats = virtue_statistics(&state.week_records);

        if let Some(virtue) = catalog::virtue_by_id(virtue_id) {
            return Some(self.build_listing(virtue.id, virtue.name, virtue.description, false, &stats));
        }
        state
            .custom_virtue(virtue_id)
            .map(|c| self.build_listing(&c.id, &c.name, &c.description, true, &stats))
    }

    fn build_listing(
        &self,
        id: &str,
        name: &str,
        description: &str,
        custom: bool,
        stats: &[VirtueStats],
    ) -> VirtueListing {
        let state = self.engine.state();
        let stat = stats.iter().find(|s| s.virtue_id == id);
        VirtueListing {
            virtue_id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            custom,
            attempts: stat.map(|s| s.attempts).unwrap_or(0),
            avg_faults: stat.map(|s| s.avg_faults),
            active: state.current_virtue_id.as_deref() == Some(id),
            queued: state.virtue_queue.iter().any(|q| q == id),
        }
    }

    /// Format output based on options.
    pub fn format_output(
        &self,
        output: &VirtuesOutput,
        action: &VirtuesAction,
        options: &VirtuesOptions,
    ) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output, action)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &VirtuesOutput, action: &VirtuesAction) -> String {
        if !output.success {
            return format!(
                "Virtues unchanged: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        match action {
            VirtuesAction::List => self.format_listing(&output.virtues),
            VirtuesAction::Show { virtue_id } => self.format_detail(virtue_id, &output.virtues),
            VirtuesAction::Add { name, .. } => format!(
                "Added custom virtue {}: id {}\nQueue it with 'almanack queue add {}'.\n",
                name,
                output.created_id.as_deref().unwrap_or("unknown"),
                output.created_id.as_deref().unwrap_or("<id>")
            ),
            VirtuesAction::Remove { virtue_id } => {
                format!("Removed custom virtue '{}'.\n", virtue_id)
            }
        }
    }

    fn format_listing(&self, virtues: &[VirtueListing]) -> String {
        let mut text = String::from("The virtues:\n");
        for listing in virtues {
            let mut markers = Vec::new();
            if listing.active {
                markers.push("practicing now");
            }
            if listing.queued {
                markers.push("queued");
            }
            if listing.custom {
                markers.push("custom");
            }
            let suffix = if markers.is_empty() {
                String::new()
            } else {
                format!(" [{}]", markers.join(", "))
            };
            text.push_str(&format!(
                "  {} ({}): {}{}\n",
                listing.name, listing.virtue_id, listing.description, suffix
            ));
        }
        text
    }

    fn format_detail(&self, virtue_id: &str, virtues: &[VirtueListing]) -> String {
        let Some(listing) = virtues.first() else {
            return String::new();
        };

        let mut text = format!("{}\n  {}\n", listing.name, listing.description);
        if let Some(virtue) = catalog::virtue_by_id(virtue_id) {
            if virtue.full_description != virtue.description {
                text.push_str(&format!("  In full: {}\n", virtue.full_description));
            }
            text.push_str(&format!("\n{}\n", virtue.context));
            text.push_str(&format!("\n\"{}\"\n", virtue.quote));
        } else if let Some(custom) = self.engine.state().custom_virtue(virtue_id) {
            if !custom.context.is_empty() {
                text.push_str(&format!("\n{}\n", custom.context));
            }
        }

        if listing.attempts > 0 {
            text.push_str(&format!(
                "\nPracticed {} {}, averaging {:.1} faults.\n",
                listing.attempts,
                if listing.attempts == 1 { "week" } else { "weeks" },
                listing.avg_faults.unwrap_or(0.0)
            ));
        } else {
            text.push_str("\nNot yet practiced.\n");
        }
        text
    }
}
