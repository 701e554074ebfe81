//! Members command - print the team member cards.

use crate::cli::MembersArgs;
use amble_core::members::{MemberCard, cards, default_roster, load_roster};
use anyhow::Result;

/// Execute the members command
pub fn execute(args: MembersArgs) -> Result<()> {
    let roster = match &args.roster {
        Some(path) => load_roster(path)?,
        None => default_roster(),
    };

    for card in cards(&roster) {
        println!("{}", describe(&card));
    }
    Ok(())
}

fn describe(card: &MemberCard) -> String {
    let mut lines = vec![format!("## {}", card.heading)];
    if let Some(logo) = &card.logo {
        lines.push(format!("   logo:    {logo}"));
    }
    if let Some(description) = &card.description {
        lines.push(format!("   {description}"));
    }
    if let Some(website) = &card.website {
        lines.push(format!("   website: {} [{}]", website.href, website.badge));
    }
    if let Some(github) = &card.github {
        lines.push(format!("   github:  {} [{}]", github.href, github.badge));
    }
    lines.join("\n")
}
