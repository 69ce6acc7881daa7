use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use fondant::cache::load_cache;
use fondant::config::data::{CollectionConfig, ConfigData, Creator};
use fondant::guards::{self, allowlist};
use fondant::provision::{process_provision, DeployBackend, MachineAddresses, ProvisionArgs};
use solana_sdk::pubkey::Pubkey;

struct RecordingBackend {
    machine: MachineAddresses,
    collection: Pubkey,
    collections_created: AtomicUsize,
    machines_created: AtomicUsize,
    guards_updated: AtomicUsize,
    last_guards: Mutex<Option<guards::CandyGuardData>>,
}

impl RecordingBackend {
    fn new() -> Self {
        RecordingBackend {
            machine: MachineAddresses {
                candy_machine: Pubkey::new_unique(),
                candy_guard: Pubkey::new_unique(),
            },
            collection: Pubkey::new_unique(),
            collections_created: AtomicUsize::new(0),
            machines_created: AtomicUsize::new(0),
            guards_updated: AtomicUsize::new(0),
            last_guards: Mutex::new(None),
        }
    }
}

#[async_trait]
impl DeployBackend for RecordingBackend {
    async fn create_collection(
        &self,
        _collection: &CollectionConfig,
        _creators: &[Creator],
    ) -> Result<Pubkey> {
        self.collections_created.fetch_add(1, Ordering::SeqCst);
        Ok(self.collection)
    }

    async fn create_machine(
        &self,
        _config: &ConfigData,
        _collection_mint: &Pubkey,
        guards: &guards::CandyGuardData,
    ) -> Result<MachineAddresses> {
        self.machines_created.fetch_add(1, Ordering::SeqCst);
        *self.last_guards.lock().unwrap() = Some(guards.clone());
        Ok(self.machine)
    }

    async fn update_guards(
        &self,
        _candy_guard: &Pubkey,
        guards: &guards::CandyGuardData,
    ) -> Result<()> {
        self.guards_updated.fetch_add(1, Ordering::SeqCst);
        *self.last_guards.lock().unwrap() = Some(guards.clone());
        Ok(())
    }
}

fn write_config(dir: &std::path::Path, allow_list_members: &[Pubkey]) -> (String, Pubkey) {
    let destination = Pubkey::new_unique();
    let members: Vec<String> = allow_list_members.iter().map(|m| m.to_string()).collect();

    let config = serde_json::json!({
        "number": 100,
        "symbol": "FDNT",
        "sellerFeeBasisPoints": 0,
        "isMutable": true,
        "creators": [{ "address": destination.to_string(), "share": 100 }],
        "collection": {
            "name": "Rejected f00kers",
            "uri": "https://arweave.net/MfllB5p9EeidnRRz3ToNUfnTwwmjbqZvOJOkL7GnEEY"
        },
        "guards": {
            "default": {
                "botTax": { "value": 0.1337, "lastInstruction": true },
                "startDate": { "date": "2022-11-22T18:00:00Z" }
            },
            "groups": [
                {
                    "label": "Public",
                    "guards": {
                        "solPayment": { "value": 0.69, "destination": destination.to_string() }
                    }
                },
                {
                    "label": "OGs",
                    "guards": { "allowList": {} }
                }
            ]
        },
        "allowLists": [{ "label": "OGs", "addresses": members }]
    });

    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    (path.to_str().unwrap().to_string(), destination)
}

#[tokio::test]
async fn provisioning_is_idempotent_through_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let members = vec![Pubkey::new_unique(), Pubkey::new_unique()];
    let (config_path, _) = write_config(dir.path(), &members);
    let cache_path = dir.path().join("cache.json");
    let cache_path = cache_path.to_str().unwrap().to_string();
    let authority = Pubkey::new_unique();

    let backend = RecordingBackend::new();
    let args = || ProvisionArgs {
        config: config_path.clone(),
        cache: cache_path.clone(),
        env: "devnet".to_string(),
    };

    let cache = process_provision(args(), &authority, &backend).await.unwrap();
    assert_eq!(cache.program.candy_machine, backend.machine.candy_machine.to_string());
    assert_eq!(cache.program.candy_guard, backend.machine.candy_guard.to_string());
    assert_eq!(cache.program.collection_mint, backend.collection.to_string());
    assert_eq!(cache.program.candy_machine_creator, authority.to_string());

    // the record survives on disk
    let reloaded = load_cache(&cache_path, false).unwrap();
    assert!(reloaded.program.is_provisioned());

    // a second run reuses the collection and updates instead of recreating
    process_provision(args(), &authority, &backend).await.unwrap();
    assert_eq!(backend.collections_created.load(Ordering::SeqCst), 1);
    assert_eq!(backend.machines_created.load(Ordering::SeqCst), 1);
    assert_eq!(backend.guards_updated.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn allow_list_roots_are_derived_from_address_lists() {
    let dir = tempfile::tempdir().unwrap();
    let members = vec![
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
    ];
    let (config_path, _) = write_config(dir.path(), &members);
    let cache_path = dir.path().join("cache.json");
    let backend = RecordingBackend::new();

    process_provision(
        ProvisionArgs {
            config: config_path,
            cache: cache_path.to_str().unwrap().to_string(),
            env: "devnet".to_string(),
        },
        &Pubkey::new_unique(),
        &backend,
    )
    .await
    .unwrap();

    let guards = backend.last_guards.lock().unwrap().clone().unwrap();
    let ogs = guards.resolve(Some("OGs"));
    let leaves: Vec<[u8; 32]> = members.iter().map(|m| m.to_bytes()).collect();

    assert_eq!(
        ogs.allow_list.unwrap().merkle_root,
        allowlist::merkle_root(&leaves)
    );
    // default guards carry over into the group
    assert!(ogs.bot_tax.is_some());
}
