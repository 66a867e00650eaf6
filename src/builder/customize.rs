use super::method::MethodBuilder;
use super::unit::CodeUnit;
use crate::naming::upper_camel;
use indexmap::IndexMap;
use tracing::debug;

pub type Customizer<'a> = Box<dyn Fn(&mut MethodBuilder) + 'a>;

/// Table of member name -> customizer for generators that stamp out a
/// fixed list of members.
///
/// A member without an entry is still emitted with its bare signature, so
/// new members can be added to a fixed list without touching tables that do
/// not care about them.
#[derive(Default)]
pub struct Customizers<'a> {
    table: IndexMap<String, Customizer<'a>>,
}

impl<'a> Customizers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the customizer of `member`, replacing any previous one.
    pub fn on<F>(mut self, member: &str, customize: F) -> Self
    where
        F: Fn(&mut MethodBuilder) + 'a,
    {
        self.table.insert(member.to_string(), Box::new(customize));
        self
    }

    /// Runs `customize` after the current customizer of `member`, or on its
    /// own when there is none.
    pub fn then<F>(mut self, member: &str, customize: F) -> Self
    where
        F: Fn(&mut MethodBuilder) + 'a,
    {
        let combined: Customizer<'a> = match self.table.shift_remove(member) {
            Some(previous) => Box::new(move |method: &mut MethodBuilder| {
                previous(method);
                customize(method);
            }),
            None => Box::new(customize),
        };
        self.table.insert(member.to_string(), combined);
        self
    }

    pub fn contains(&self, member: &str) -> bool {
        self.table.contains_key(member)
    }

    /// Applies the customizer of `member`. Returns whether one was found.
    pub fn apply(&self, member: &str, method: &mut MethodBuilder) -> bool {
        match self.table.get(member) {
            Some(customize) => {
                customize(method);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Customizers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

/// Conventional hook name of a member: `findById` -> `customizeFindById`.
pub fn hook_name(member: &str) -> String {
    format!("customize{}", upper_camel(member))
}

/// Adds every member of `members` to `unit`, in order, running the matching
/// customizer on each before moving on.
pub fn stamp_methods(unit: &mut CodeUnit, members: &[&str], customizers: &Customizers<'_>) {
    for member in members {
        let method = unit.add_method(*member);
        if customizers.apply(member, method) {
            debug!(member, hook = %hook_name(member), "customized member");
        } else {
            debug!(member, hook = %hook_name(member), "no customizer, emitting bare signature");
        }
    }
}
