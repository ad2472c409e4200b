//! The graph node and the attach/detach operations that keep the parent
//! invariant intact.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use indexmap::IndexMap;
use xbf_metadata::{XamlProperty, XamlType};

use crate::value::Value;

/// Shared handle to a graph node. Strong handles live in exactly one
/// container slot (plus whatever the caller holds); everything else is
/// [`XamlObjectWeak`].
pub type XamlObjectRef = Rc<RefCell<XamlObject>>;

/// Non-owning handle to a graph node, used for parent pointers and
/// namescope entries.
pub type XamlObjectWeak = Weak<RefCell<XamlObject>>;

/// One node of a deserialized markup tree.
///
/// Mutation that moves nodes between containers must go through
/// [`set_value`], [`add_collection_item`], [`add_dictionary_item`], and
/// [`detach`]; those keep `parent` consistent with exactly one container
/// slot in exactly one other node (or none, for a root).
#[derive(Debug)]
pub struct XamlObject {
    ty: XamlType,
    properties: IndexMap<XamlProperty, Value>,
    collection_items: Vec<Value>,
    dictionary_items: IndexMap<Arc<str>, Value>,
    namescope: IndexMap<String, XamlObjectWeak>,
    xml_namespaces: IndexMap<String, String>,
    parent: Option<XamlObjectWeak>,
}

impl XamlObject {
    /// Create a detached node of the given type.
    pub fn new(ty: XamlType) -> XamlObjectRef {
        Rc::new(RefCell::new(Self {
            ty,
            properties: IndexMap::new(),
            collection_items: Vec::new(),
            dictionary_items: IndexMap::new(),
            namescope: IndexMap::new(),
            xml_namespaces: IndexMap::new(),
            parent: None,
        }))
    }

    /// The node's type descriptor.
    pub fn ty(&self) -> &XamlType {
        &self.ty
    }

    /// The property map, in assignment order.
    pub fn properties(&self) -> &IndexMap<XamlProperty, Value> {
        &self.properties
    }

    /// Look up a single property value.
    pub fn get(&self, property: &XamlProperty) -> Option<&Value> {
        self.properties.get(property)
    }

    /// Collection items in source order. Empty for non-collection nodes.
    pub fn collection_items(&self) -> &[Value] {
        &self.collection_items
    }

    /// Dictionary entries. Empty for non-dictionary nodes.
    pub fn dictionary_items(&self) -> &IndexMap<Arc<str>, Value> {
        &self.dictionary_items
    }

    /// The owning node, if this node is attached anywhere.
    pub fn parent(&self) -> Option<XamlObjectRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Prefix bindings visible to this node and, unless shadowed, its
    /// descendants.
    pub fn xml_namespaces(&self) -> &IndexMap<String, String> {
        &self.xml_namespaces
    }

    /// Bind a namespace prefix on this node. Re-binding shadows.
    pub fn add_namespace(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.xml_namespaces.insert(prefix.into(), namespace.into());
    }

    /// Look up a registered name in this node's namescope.
    pub fn find_name(&self, name: &str) -> Option<XamlObjectRef> {
        self.namescope.get(name).and_then(Weak::upgrade)
    }

    /// The names registered in this node's namescope, in registration order.
    pub fn registered_names(&self) -> impl Iterator<Item = &str> {
        self.namescope.keys().map(String::as_str)
    }
}

impl PartialEq for XamlObject {
    /// Structural equality: type, properties, collection order, dictionary
    /// contents, namespaces, and registered names. Parent linkage and
    /// namescope targets are identity-bound and deliberately excluded.
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self.properties == other.properties
            && self.collection_items == other.collection_items
            && self.dictionary_items == other.dictionary_items
            && self.xml_namespaces == other.xml_namespaces
            && self.namescope.len() == other.namescope.len()
            && self
                .namescope
                .keys()
                .all(|name| other.namescope.contains_key(name))
    }
}

/// Assign `value` to `property` on `object`.
///
/// Last write wins: a previous value is replaced outright, and if it was an
/// object its parent pointer is cleared. If the new value is an object that
/// already has a parent, it is detached from that parent's container first.
/// Detach-old, store, attach-new happen as one operation; call sites never
/// do the bookkeeping themselves.
///
/// Repeated assignment silently discards the earlier value; the original
/// compiler relies on this for conditional-markup alternatives.
pub fn set_value(object: &XamlObjectRef, property: XamlProperty, value: Value) {
    attach(&value, object);
    let old = object.borrow_mut().properties.shift_remove(&property);
    if let Some(old) = old {
        clear_parent(&old);
    }
    object.borrow_mut().properties.insert(property, value);
}

/// Append `value` to `object`'s collection items, attaching it.
pub fn add_collection_item(object: &XamlObjectRef, value: Value) {
    attach(&value, object);
    object.borrow_mut().collection_items.push(value);
}

/// Insert `value` under `key` in `object`'s dictionary.
///
/// Keys are unique; re-insertion replaces and detaches the displaced value.
pub fn add_dictionary_item(object: &XamlObjectRef, key: Arc<str>, value: Value) {
    attach(&value, object);
    let old = object.borrow_mut().dictionary_items.shift_remove(&key);
    if let Some(old) = old {
        clear_parent(&old);
    }
    object.borrow_mut().dictionary_items.insert(key, value);
}

/// Register `node` under `name` in `scope`'s namescope.
///
/// A non-owning index, not an attachment: the node's parent is untouched.
/// Re-registering a name overwrites.
pub fn register_name(scope: &XamlObjectRef, name: impl Into<String>, node: &XamlObjectRef) {
    scope
        .borrow_mut()
        .namescope
        .insert(name.into(), Rc::downgrade(node));
}

/// Detach `node` from its parent, removing it from whichever container
/// slot holds it and clearing its parent pointer. No-op for roots.
pub fn detach(node: &XamlObjectRef) {
    let parent = node.borrow().parent();
    if let Some(parent) = parent {
        remove_from_slots(&parent, node);
    }
    node.borrow_mut().parent = None;
}

fn attach(value: &Value, parent: &XamlObjectRef) {
    if let Value::Object(child) = value {
        detach(child);
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
    }
}

fn clear_parent(value: &Value) {
    if let Value::Object(child) = value {
        child.borrow_mut().parent = None;
    }
}

fn remove_from_slots(parent: &XamlObjectRef, child: &XamlObjectRef) {
    let is_child = |value: &Value| matches!(value, Value::Object(o) if Rc::ptr_eq(o, child));

    let mut parent = parent.borrow_mut();
    if let Some(key) = parent
        .properties
        .iter()
        .find_map(|(k, v)| is_child(v).then(|| k.clone()))
    {
        parent.properties.shift_remove(&key);
        return;
    }
    if let Some(pos) = parent.collection_items.iter().position(is_child) {
        parent.collection_items.remove(pos);
        return;
    }
    if let Some(key) = parent
        .dictionary_items
        .iter()
        .find_map(|(k, v)| is_child(v).then(|| k.clone()))
    {
        parent.dictionary_items.shift_remove(&key);
    }
}
