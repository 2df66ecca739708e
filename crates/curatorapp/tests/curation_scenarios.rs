use curatorapp::auth::{Principal, Role};
use curatorapp::commands::query::ListingQuery;
use curatorapp::commands::save::SaveRequest;
use curatorapp::config::CuratorConfig;
use curatorapp::model::{ItemId, ItemStatus, Module, ModuleChange, NewItem};
use curatorapp::modules::{ModuleRegistry, FEATURED_SIZE_META_KEY};
use curatorapp::store::memory::MemHost;
use curatorapp::store::{ContentStore, TermStore};
use curatorapp::CuratorApi;

fn api() -> CuratorApi<MemHost> {
    let config = CuratorConfig {
        featured_sizes: Some(vec!["1x1".into(), "2x1".into()]),
        ..CuratorConfig::default().with_all_modules()
    };
    let registry = ModuleRegistry::from_config(&config).unwrap();
    let mut api = CuratorApi::new(MemHost::new(), registry);
    api.setup_default_terms().unwrap();
    api
}

fn editor() -> Principal {
    Principal::new(1, Role::Editor)
}

fn post(api: &mut CuratorApi<MemHost>, title: &str) -> ItemId {
    api.create_item(NewItem::new("post", title))
        .unwrap()
        .affected_items[0]
}

fn has_term(api: &CuratorApi<MemHost>, id: ItemId, module: Module) -> bool {
    let registry = api.registry();
    let term = api
        .host()
        .term_by_slug(registry.taxonomy(), registry.slug(module))
        .unwrap()
        .unwrap();
    api.host()
        .object_terms(id, registry.taxonomy())
        .unwrap()
        .contains(&term.id)
}

#[test]
fn curate_feature_unfeature_unpublish() {
    let mut api = api();
    for i in 1..10 {
        post(&mut api, &format!("Filler {}", i));
    }
    let original = post(&mut api, "Story");
    assert_eq!(original, ItemId(10));

    let curated = api.curate_item(&editor(), original).unwrap().affected_items[0];
    assert_eq!(curated, ItemId(11));
    assert_eq!(api.get_related(ItemId(10)).unwrap(), Some(ItemId(11)));
    assert_eq!(api.get_related(ItemId(11)).unwrap(), Some(ItemId(10)));
    assert!(has_term(&api, curated, Module::Curator));

    api.set_item_modules(&editor(), curated, &[(Module::Featurer, ModuleChange::Add)], Some("2x1"))
        .unwrap();
    assert!(has_term(&api, curated, Module::Featurer));
    assert_eq!(
        api.host().get_meta(curated, FEATURED_SIZE_META_KEY).unwrap().as_deref(),
        Some("2x1")
    );

    api.set_item_modules(&editor(), curated, &[(Module::Featurer, ModuleChange::Remove)], None)
        .unwrap();
    assert!(!has_term(&api, curated, Module::Featurer));
    assert_eq!(api.host().get_meta(curated, FEATURED_SIZE_META_KEY).unwrap(), None);

    api.set_item_status(original, ItemStatus::Draft).unwrap();
    assert_eq!(api.get_related(original).unwrap(), None);
    assert_eq!(api.host().get_item(curated).unwrap(), None);
}

#[test]
fn pin_capacity_evicts_oldest() {
    let mut api = api();
    let records: Vec<ItemId> = ["A", "B", "C", "D"]
        .iter()
        .map(|title| {
            let original = post(&mut api, title);
            api.curate_item(&editor(), original).unwrap().affected_items[0]
        })
        .collect();

    for record in &records {
        api.pin_item(&editor(), *record).unwrap();
    }

    assert_eq!(
        api.pinned_items().unwrap(),
        vec![records[3], records[2], records[1]]
    );
    assert!(!has_term(&api, records[0], Module::Pinner));
    assert!(has_term(&api, records[1], Module::Pinner));
}

#[test]
fn feed_resolves_and_surfaces_pins() {
    let mut api = api();
    let o1 = post(&mut api, "One");
    let o2 = post(&mut api, "Two");
    let c1 = api.curate_item(&editor(), o1).unwrap().affected_items[0];
    let c2 = api.curate_item(&editor(), o2).unwrap().affected_items[0];

    let query = ListingQuery::curated(api.registry());
    let raw = vec![
        api.host().get_item(c1).unwrap().unwrap(),
        api.host().get_item(c2).unwrap().unwrap(),
    ];
    let resolved: Vec<ItemId> = api
        .intercept(&query, raw)
        .unwrap()
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(resolved, vec![o1, o2]);

    api.pin_item(&editor(), c2).unwrap();
    let first_only = ListingQuery::curated(api.registry()).with_per_page(Some(1));
    let listed: Vec<ItemId> = api
        .list_curated(&first_only)
        .unwrap()
        .listed_items
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(listed, vec![o2, o1]);
}

#[test]
fn editor_form_round_trip() {
    let mut api = api();
    let original = post(&mut api, "Story");
    let editor = Principal::new(1, Role::Editor).with_session("abc");
    let form = SaveRequest::new()
        .check(Module::Curator)
        .check(Module::Pinner)
        .with_token(editor.confirmation_token());

    api.save_item(&editor, original, &form).unwrap();
    api.save_item(&editor, original, &form).unwrap();

    assert!(api.is_curated(original).unwrap());
    assert!(api.is_pinned(original).unwrap());
    let curated = api.curated_record_for(original).unwrap().unwrap();
    assert_eq!(api.pinned_items().unwrap(), vec![curated]);
    assert_eq!(api.edit_target(curated).unwrap(), original);

    api.trash_item(original).unwrap();
    assert!(!api.is_curated(original).unwrap());
    assert!(api.pinned_items().unwrap().is_empty());
}

#[test]
fn out_of_band_deletion_heals_on_read() {
    let mut api = api();
    let original = post(&mut api, "Story");
    let curated = api.curate_item(&editor(), original).unwrap().affected_items[0];

    // Someone removes the record straight from the host
    api.host_mut().delete_item(curated).unwrap();

    assert_eq!(api.get_related(original).unwrap(), None);
    let again = api.curate_item(&editor(), original).unwrap();
    assert_ne!(again.affected_items[0], curated);
}
