//! Shared-folder commands.

use std::fs;

use sherry::api::types::{FolderPayload, RemoteFolder};
use sherry::api::Api;
use sherry::auth::{AuthError, Credential};
use sherry::constants;
use sherry::paths;
use sherry::permission::PermissionWorkflow;
use sherry::source::{SettingsPatch, SourceError, SourceSettings};
use sherry::validate::{self, ValidationError};
use sherry::watcher::Watcher;
use sherry::{RegistryStore, Result};

use crate::cli::{
    CreateArgs, GetArgs, ListArgs, PermissionCommands, ShowArgs, UnwatchArgs, UpdateArgs,
};
use crate::output;
use crate::prompt;

/// Resolve the acting account (default fallback allowed) and refuse lapsed
/// sessions before any remote traffic.
fn resolve_active(registry: &RegistryStore, user: &str) -> Result<Credential> {
    let credential = registry.credentials().resolve(user, true)?;
    if credential.expired {
        return Err(AuthError::SessionExpired {
            username: credential.username.clone(),
        }
        .into());
    }
    Ok(credential.clone())
}

fn patch_from_args(pairs: &[(String, String)]) -> Result<SettingsPatch> {
    Ok(SettingsPatch::from_pairs(
        pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?)
}

fn folder_payload(name: &str, settings: &SourceSettings) -> FolderPayload {
    FolderPayload {
        name: name.to_string(),
        allow_dir: settings.allow_dir,
        max_file_size: settings.max_file_size,
        max_dir_size: settings.max_dir_size,
        allowed_file_names: settings.allowed_file_names.clone(),
        allowed_file_types: settings.allowed_file_types.clone(),
    }
}

/// Fill in whatever `--set` did not cover, interactively.
fn prompt_settings(patch: &SettingsPatch) -> Result<SourceSettings> {
    let allow_dir = match patch.allow_dir {
        Some(value) => value,
        None => prompt::confirm("Allow directories", constants::DEFAULT_ALLOW_DIR)?,
    };
    let max_file_size = match patch.max_file_size {
        Some(value) => value,
        None => prompt_size(
            "Max file size",
            constants::DEFAULT_MAX_FILE_SIZE,
            constants::MAX_FILE_SIZE,
        )?,
    };
    let max_dir_size = match patch.max_dir_size {
        Some(value) => value,
        None => prompt_size(
            "Max directory size",
            constants::DEFAULT_MAX_DIR_SIZE,
            constants::MAX_DIR_SIZE,
        )?,
    };
    let allowed_file_names = match &patch.allowed_file_names {
        Some(values) => values.clone(),
        None => prompt_list(
            "Allowed file names",
            "glob patterns separated by commas",
            validate::is_glob,
        )?,
    };
    let allowed_file_types = match &patch.allowed_file_types {
        Some(values) => values.clone(),
        None => prompt_list(
            "Allowed file types",
            "MIME types separated by commas",
            validate::is_mime,
        )?,
    };
    Ok(SourceSettings {
        allow_dir,
        max_file_size,
        max_dir_size,
        allowed_file_names,
        allowed_file_types,
    })
}

fn prompt_size(field: &str, default: u64, max: u64) -> Result<u64> {
    let raw = prompt::input_optional(
        field,
        &format!("up to {}", validate::format_data_size(max)),
        move |value| validate::parse_data_size(field, value, max).is_ok(),
    )?;
    if raw.is_empty() {
        return Ok(default);
    }
    Ok(validate::parse_data_size(field, &raw, max)?)
}

fn prompt_list(field: &str, help: &str, item_valid: fn(&str) -> bool) -> Result<Vec<String>> {
    let raw = prompt::input_optional(field, help, move |value| {
        validate::parse_value_list(field, value, item_valid).is_ok()
    })?;
    Ok(validate::parse_value_list(field, &raw, item_valid)?)
}

pub async fn create(registry: &mut RegistryStore, api: &impl Api, args: &CreateArgs) -> Result<()> {
    registry
        .run_command(async |reg| {
            let credential = resolve_active(reg, &args.user)?;
            let name = prompt::input("Name", &args.name, validate::is_word)?;
            let raw_path = prompt::input("Path", &args.path, |p| !p.is_empty())?;
            let path = paths::canonicalize(&raw_path)?;
            reg.watchers().check_no_overlap(&path)?;

            let patch = patch_from_args(&args.set)?;
            let settings = if args.yes {
                patch.materialize()
            } else {
                prompt_settings(&patch)?
            };

            let folder = api
                .folder_create(&folder_payload(&name, &settings), &credential.access_token)
                .await?;
            let key = reg
                .sources_mut()
                .upsert_from_remote(&folder, &credential.user_id)?;
            fs::create_dir_all(&path)?;
            reg.watchers_mut()
                .add(Watcher::new(key, path, credential.user_id.clone()))?;
            println!("Folder {name} is now shared");
            Ok(())
        })
        .await
}

pub async fn get(registry: &mut RegistryStore, api: &impl Api, args: &GetArgs) -> Result<()> {
    registry
        .run_command(async |reg| {
            let credential = resolve_active(reg, &args.user)?;
            let reference = prompt::input(
                "Folder (owner:folder or id)",
                &args.name,
                validate::is_folder_ref,
            )?;

            // Under --yes an omitted path lands next to the current directory,
            // named after the folder.
            let fallback_path = if args.yes && args.path.is_empty() {
                let folder_part = reference
                    .split_once(':')
                    .map(|(_, folder)| folder)
                    .unwrap_or(&reference);
                format!("./{folder_part}")
            } else {
                args.path.clone()
            };
            let raw_path = prompt::input("Path", &fallback_path, |p| !p.is_empty())?;
            if fs::metadata(&raw_path).is_ok() {
                return Err(ValidationError::PathExists {
                    path: raw_path.clone(),
                }
                .into());
            }
            let path = paths::canonicalize(&raw_path)?;
            reg.watchers().check_no_overlap(&path)?;

            let folder = api.folder_get(&reference, &credential.access_token).await?;
            let key = reg
                .sources_mut()
                .upsert_from_remote(&folder, &credential.user_id)?;
            fs::create_dir_all(&path)?;
            reg.watchers_mut()
                .add(Watcher::new(key, path, credential.user_id.clone()))?;
            println!(
                "Folder {} will be populated by the sync service",
                folder.name
            );
            Ok(())
        })
        .await
}

pub fn show(registry: &RegistryStore, args: &ShowArgs) -> Result<()> {
    let user_filter = if args.user.is_empty() {
        None
    } else {
        Some(registry.credentials().resolve(&args.user, false)?.user_id.clone())
    };

    let mut shown = 0;
    for source in registry.sources().iter() {
        if let Some(user_id) = &user_filter {
            if &source.user_id != user_id {
                continue;
            }
        }
        if !args.name.is_empty() && source.name != args.name {
            continue;
        }
        let username = registry
            .credentials()
            .get_by_id(&source.user_id)
            .map(|c| c.username.clone())
            .unwrap_or_else(|_| source.user_id.clone());
        println!("Folder: {}", source.name);
        println!("User: {username}");
        for watcher in registry.watchers().find_by_source(&source.key()) {
            println!("Watching: {}", watcher.local_path);
        }
        output::print_json(source);
        println!();
        shown += 1;
    }
    if shown == 0 {
        println!("No folders to show");
    }
    Ok(())
}

pub async fn list(registry: &RegistryStore, api: &impl Api, args: &ListArgs) -> Result<()> {
    if registry.watchers().is_empty() {
        println!("No folders are being watched");
    } else {
        let rows: Vec<Vec<String>> = registry
            .watchers()
            .iter()
            .map(|watcher| {
                let source = registry.sources().get(&watcher.source);
                vec![
                    watcher.local_path.to_string(),
                    source.map(|s| s.name.clone()).unwrap_or_else(|| "?".to_string()),
                    source
                        .map(|s| s.access.to_string())
                        .unwrap_or_else(|| "?".to_string()),
                    if watcher.complete { "synced" } else { "pending" }.to_string(),
                ]
            })
            .collect();
        output::print_table(&["PATH", "FOLDER", "ACCESS", "STATE"], &rows);
    }

    if args.available {
        let credential = resolve_active(registry, &args.user)?;
        let mut folders = api.my_folders(&credential.access_token).await?;
        folders.extend(api.available_folders(&credential.access_token).await?);
        println!();
        print_remote_folders(&folders);
    }
    Ok(())
}

fn print_remote_folders(folders: &[RemoteFolder]) {
    if folders.is_empty() {
        println!("No folders available from the service");
        return;
    }
    let rows: Vec<Vec<String>> = folders
        .iter()
        .map(|folder| {
            vec![
                folder.name.clone(),
                folder.sherry_id.clone(),
                validate::format_data_size(folder.max_dir_size),
            ]
        })
        .collect();
    output::print_table(&["FOLDER", "ID", "MAX SIZE"], &rows);
}

pub async fn update(registry: &mut RegistryStore, api: &impl Api, args: &UpdateArgs) -> Result<()> {
    registry
        .run_command(async |reg| {
            let credential = resolve_active(reg, &args.user)?;
            let name = prompt::input("Name", &args.name, validate::is_word)?;
            let source = reg
                .sources()
                .find_owned_by(&credential.user_id, &name)
                .cloned()
                .ok_or_else(|| SourceError::NotFound { name: name.clone() })?;

            let patch = patch_from_args(&args.set)?;
            let settings = patch.apply_to(&source);
            api.folder_update(
                &source.id,
                &folder_payload(&source.name, &settings),
                &credential.access_token,
            )
            .await?;
            reg.sources_mut().apply_update(&source.key(), &patch)?;
            println!("Folder {} updated", source.name);
            Ok(())
        })
        .await
}

pub async fn unwatch(registry: &mut RegistryStore, args: &UnwatchArgs) -> Result<()> {
    registry
        .run_command(async |reg| {
            let raw_path = prompt::input("Path", &args.path, |p| !p.is_empty())?;
            let path = paths::canonicalize(&raw_path)?;
            let assume_yes = args.yes;
            let removed = reg.watchers_mut().remove_by_path(&path, |watcher| {
                if assume_yes {
                    return true;
                }
                prompt::confirm(
                    &format!(
                        "{path} is watched through {}, stop watching the whole folder?",
                        watcher.local_path
                    ),
                    false,
                )
                .unwrap_or(false)
            })?;
            println!("Stopped watching {}", removed.local_path);
            Ok(())
        })
        .await
}

pub async fn permission(
    registry: &mut RegistryStore,
    api: &impl Api,
    command: &PermissionCommands,
) -> Result<()> {
    match command {
        PermissionCommands::Grant(args) => {
            registry
                .run_command(async |reg| {
                    let workflow = PermissionWorkflow::new(api);
                    workflow
                        .grant(reg, &args.user, &args.target, &args.name, args.role.into())
                        .await?;
                    println!("Granted {} to {}", args.name, args.target);
                    Ok(())
                })
                .await
        }
        PermissionCommands::Revoke(args) => {
            registry
                .run_command(async |reg| {
                    let workflow = PermissionWorkflow::new(api);
                    workflow
                        .revoke(reg, &args.user, &args.target, &args.name)
                        .await?;
                    println!("Revoked {} from {}", args.name, args.target);
                    Ok(())
                })
                .await
        }
    }
}
