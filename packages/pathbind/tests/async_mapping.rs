#![cfg(feature = "async")]

use pathbind::{
    record, AsyncMapper, Error, Field, InMemoryConfig, InMemoryKvStore, PathVars, SyncToAsync,
    TextField, UintField,
};

#[derive(Debug, Default, PartialEq)]
struct Counter {
    label: TextField,
    hits: UintField,
}

record!(Counter {
    label: leaf => "/counters/:name/label",
    hits: leaf => "/counters/:name/hits",
});

fn vars() -> PathVars {
    PathVars::new().with("name", "home")
}

#[tokio::test]
async fn set_get_and_delete() {
    let mapper = AsyncMapper::new(SyncToAsync::new(InMemoryKvStore::new()));

    let mut written = Counter {
        label: Field::write("Home page"),
        hits: Field::write(7u64),
    };
    mapper.set(&mut written, &vars()).await.unwrap();

    let mut read = Counter {
        label: Field::fetch(),
        hits: Field::fetch(),
    };
    mapper.get(&mut read, &vars()).await.unwrap();
    assert_eq!(read, written);

    let mut forget = Counter {
        hits: Field::delete(),
        ..Default::default()
    };
    mapper.set(&mut forget, &vars()).await.unwrap();

    let mut read = Counter {
        label: Field::fetch(),
        hits: Field::fetch(),
    };
    mapper.get(&mut read, &vars()).await.unwrap();
    assert_eq!(read.label, TextField::write("Home page"));
    assert!(read.hits.is_absent());
}

#[tokio::test]
async fn store_limit_surfaces_as_transaction_error() {
    let store = InMemoryKvStore::with_config(InMemoryConfig { max_txn_ops: 1 });
    let mapper = AsyncMapper::new(SyncToAsync::new(store));

    let mut written = Counter {
        label: Field::write("x"),
        hits: Field::write(1u64),
    };
    let err = mapper.set(&mut written, &vars()).await.unwrap_err();
    assert!(matches!(err, Error::Transaction(_)));
    assert!(mapper.store().inner().is_empty().unwrap());
}
