use crate::cli::{CreateProfileArgs, UserArgs};
use crate::config::Config;
use crate::model::{Equipment, Profile};
use crate::output::render_profile;
use crate::storage::Storage;
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

pub async fn create(args: CreateProfileArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    let user_id = args
        .user
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    // Parse and dedupe the equipment list
    let mut equipment = BTreeSet::new();
    for item in &args.equipment {
        equipment.insert(item.parse::<Equipment>()?);
    }

    let profile = Profile {
        user_id,
        age: args.age,
        gender: args.gender,
        height_cm: args.height_cm,
        weight_kg: args.weight_kg,
        goal: args.goal.parse()?,
        experience: args.experience.parse()?,
        equipment: equipment.into_iter().collect(),
        session_minutes: args.minutes,
        days_per_week: args.days,
    };
    profile.validate()?;

    let storage = Storage::new(&config.data_dir);
    storage.save_profile(&profile).await?;

    info!(user = %profile.user_id, "profile saved");
    println!("Profile saved for user '{}'", profile.user_id);
    Ok(())
}

pub async fn show(args: UserArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let storage = Storage::new(&config.data_dir);

    let profile = storage.get_profile(&args.user).await?;
    print!("{}", render_profile(&profile));
    Ok(())
}

pub async fn delete(args: UserArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let storage = Storage::new(&config.data_dir);

    storage.delete_user(&args.user).await?;
    println!("Deleted all data for user '{}'", args.user);
    Ok(())
}
