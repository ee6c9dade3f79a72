use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex};

use flexi_logger::{Logger, LoggerHandle};
use scopeguard::{OnUnwind, ScopeGuard};
use splay_tree::error::{Result, TreeError};
use splay_tree::splay_tree::Key;
use splay_tree::SplayTree;

#[allow(dead_code)]
pub static LOGGER: LazyLock<Mutex<LoggerHandle>> = LazyLock::new(|| {
    Mutex::new(
        Logger::try_with_env_or_str("info")
            .unwrap()
            .write_mode(flexi_logger::WriteMode::SupportCapture)
            .log_to_stdout()
            .set_palette("196;208;3;7;8".to_owned())
            .format(|w, now, record| {
                let style = flexi_logger::style(record.level());
                write!(
                    w,
                    "{} {pref}[{}] {}{suf}",
                    now.format("%H:%M:%S"),
                    &record.level().as_str()[0..1],
                    record.args(),
                    pref = style.prefix(),
                    suf = style.suffix(),
                )
            })
            .start()
            .unwrap(),
    )
});

#[allow(dead_code)]
pub fn init_logger() {
    let _ = &*LOGGER;
}

/// Logs the tree if the test panics while it is alive.
#[allow(dead_code)]
pub fn guard(t: SplayTree) -> ScopeGuard<SplayTree, impl FnOnce(SplayTree), OnUnwind> {
    scopeguard::guard_on_unwind(t, |t| log::error!("Crash with {t:?}"))
}

/// Reference model, same answers as the splay tree without any reshaping.
#[allow(dead_code)]
#[derive(Debug, Default, Clone)]
pub struct SlowTree(pub BTreeMap<Key, String>);

#[allow(dead_code)]
impl SlowTree {
    pub fn add(&mut self, key: Key, value: &str) -> Result<()> {
        if self.0.contains_key(&key) {
            return Err(TreeError::DuplicateKey(key));
        }
        self.0.insert(key, value.to_owned());
        Ok(())
    }
    pub fn set(&mut self, key: Key, value: &str) -> Result<()> {
        let v = self.0.get_mut(&key).ok_or(TreeError::KeyNotFound(key))?;
        *v = value.to_owned();
        Ok(())
    }
    pub fn delete(&mut self, key: Key) -> Result<()> {
        self.0
            .remove(&key)
            .map(drop)
            .ok_or(TreeError::KeyNotFound(key))
    }
    pub fn search(&self, key: Key) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }
    pub fn min(&self) -> Result<(Key, &str)> {
        self.0
            .first_key_value()
            .map(|(k, v)| (*k, v.as_str()))
            .ok_or(TreeError::EmptyTree)
    }
    pub fn max(&self) -> Result<(Key, &str)> {
        self.0
            .last_key_value()
            .map(|(k, v)| (*k, v.as_str()))
            .ok_or(TreeError::EmptyTree)
    }
    pub fn entries(&self) -> Vec<(Key, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

/// One slot of a parsed level-order dump.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpNode {
    pub key: Key,
    pub value: String,
    pub parent: Option<Key>,
}

/// Parses the output of `SplayTree::level_order`. Values must not end in `]`.
#[allow(dead_code)]
pub fn parse_dump(dump: &str) -> Vec<Vec<Option<DumpNode>>> {
    let mut levels = vec![];
    for line in dump.lines() {
        let mut slots = vec![];
        let mut tokens = line.split(' ');
        while let Some(tok) = tokens.next() {
            if tok == "_" {
                slots.push(None);
                continue;
            }
            let mut parts = vec![tok.strip_prefix('[').expect(line).to_owned()];
            while !parts.last().unwrap().ends_with(']') {
                parts.push(tokens.next().expect(line).to_owned());
            }
            let last = parts.pop().unwrap();
            parts.push(last.strip_suffix(']').unwrap().to_owned());
            let key = parts[0].parse().expect(line);
            let node = match parts.len() {
                2 => DumpNode {
                    key,
                    value: parts[1].clone(),
                    parent: None,
                },
                3 => DumpNode {
                    key,
                    value: parts[1].clone(),
                    parent: Some(parts[2].parse().expect(line)),
                },
                _ => panic!("bad token in {line:?}"),
            };
            slots.push(Some(node));
        }
        levels.push(slots);
    }
    levels
}

/// Checks the dump of `t` for shape, parent links and key order. Returns the
/// number of nodes seen.
#[allow(dead_code)]
pub fn assert_dump_consistent(t: &SplayTree) -> usize {
    let dump = t.level_order().to_string();
    let levels = parse_dump(&dump);
    if t.is_empty() {
        assert_eq!(dump, "_");
        return 0;
    }
    assert_eq!(levels.len(), t.height(), "{dump}");
    let root = levels[0][0].as_ref().expect("root line");
    assert_eq!(levels[0].len(), 1);
    assert_eq!(root.parent, None);
    assert_eq!(t.root(), Some((root.key, root.value.as_str())));
    // (key, lower bound, upper bound) for each slot
    let mut bounds = vec![Some((root.key, Key::MIN, Key::MAX))];
    let mut count = 1;
    for (d, level) in levels.iter().enumerate().skip(1) {
        assert_eq!(level.len(), 1 << d, "level {d} of\n{dump}");
        assert!(level.iter().any(Option::is_some), "empty level {d}\n{dump}");
        let mut next_bounds = vec![];
        for (pos, slot) in level.iter().enumerate() {
            let parent = bounds[pos / 2];
            let Some(node) = slot else {
                next_bounds.push(None);
                continue;
            };
            count += 1;
            let (pk, lo, hi) = parent.expect("node under an empty slot");
            assert_eq!(node.parent, Some(pk), "slot {pos} of level {d}\n{dump}");
            let (lo, hi) = if pos % 2 == 0 { (lo, pk) } else { (pk, hi) };
            assert!(lo <= node.key && node.key <= hi && node.key != pk, "{dump}");
            next_bounds.push(Some((node.key, lo, hi)));
        }
        bounds = next_bounds;
    }
    assert_eq!(count, t.len(), "{dump}");
    count
}
