//! The recursive-descent graph builder and the document entry points.

use std::sync::Arc;

use tracing::trace;
use xbf_metadata::{PropertyIndex, RecordShape, Registry, TypeIndex, XamlProperty, XamlType};
use xbf_model::{
    MarkupExtension, StreamOffsetToken, Value, XamlObject, XamlObjectRef, add_collection_item,
    add_dictionary_item, register_name, set_value,
};

use crate::cursor::XbfCursor;
use crate::error::XbfError;
use crate::pool::SharedPool;
use crate::wire;

/// How enum constants outside the declared member list are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumMode {
    /// Reject unknown constants with [`XbfError::UnknownEnumValue`].
    /// The default.
    #[default]
    Strict,
    /// Pass unknown constants through, for forward compatibility with
    /// newer enum members. An explicit caller opt-in.
    Lenient,
}

/// Options for a deserialization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Enum constant validation mode.
    pub enum_mode: EnumMode,
}

/// Deserialize a stream with default options.
///
/// The registry must match the metadata set the stream was compiled
/// against; the loader that owns the stream knows which one that is.
pub fn from_slice<'buf>(
    input: &'buf [u8],
    registry: &Arc<Registry>,
) -> Result<XbfDocument<'buf>, XbfError> {
    from_slice_with_options(input, registry, DecodeOptions::default())
}

/// Deserialize a stream.
///
/// All-or-nothing: any failure aborts the whole parse and no partial
/// graph is returned.
pub fn from_slice_with_options<'buf>(
    input: &'buf [u8],
    registry: &Arc<Registry>,
    options: DecodeOptions,
) -> Result<XbfDocument<'buf>, XbfError> {
    let mut cursor = XbfCursor::new(input);

    let magic = cursor.read_bytes(wire::MAGIC.len())?;
    if magic != wire::MAGIC {
        return Err(XbfError::InvalidMagic { offset: 0 });
    }

    let version_offset = cursor.position();
    let version = cursor.read_varint_u32()?;
    if version != wire::FORMAT_VERSION {
        return Err(XbfError::UnsupportedFormatVersion {
            version,
            offset: version_offset,
        });
    }

    let pool = SharedPool::parse(&mut cursor)?;
    let body_start = cursor.position();
    trace!(version, body_start, pool_len = pool.len(), "stream header read");

    let root = {
        let mut builder = GraphBuilder {
            cursor,
            registry,
            pool: &pool,
            options,
            scopes: Vec::new(),
        };
        match builder.build_record()? {
            Value::Object(root) => root,
            _ => return Err(XbfError::InvalidRootRecord { offset: body_start }),
        }
    };

    Ok(XbfDocument {
        input,
        registry: Arc::clone(registry),
        pool,
        options,
        version,
        body_start,
        root,
    })
}

/// A deserialized stream: the root object plus everything needed to
/// resolve deferred tokens against the same buffer later.
#[derive(Debug)]
pub struct XbfDocument<'buf> {
    input: &'buf [u8],
    registry: Arc<Registry>,
    pool: SharedPool,
    options: DecodeOptions,
    version: u32,
    body_start: usize,
    root: XamlObjectRef,
}

impl XbfDocument<'_> {
    /// The root object.
    pub fn root(&self) -> &XamlObjectRef {
        &self.root
    }

    /// The stream's format version tag.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The stream's shared string pool.
    pub fn pool(&self) -> &SharedPool {
        &self.pool
    }

    /// Materialize the record a token points at.
    ///
    /// Re-enters the builder at the token's offset against the same
    /// buffer, registry, and pool. Pure and unmemoized: resolving the
    /// same token twice yields value-equal but distinct graphs.
    pub fn resolve(&self, token: StreamOffsetToken) -> Result<Value, XbfError> {
        let target = token.offset().ok_or(XbfError::CorruptOffsetToken {
            token,
            offset: self.body_start,
        })?;
        let target = usize::try_from(target).ok().filter(|&t| {
            t >= self.body_start && t < self.input.len()
        });
        let Some(target) = target else {
            return Err(XbfError::CorruptOffsetToken {
                token,
                offset: self.body_start,
            });
        };

        let mut builder = GraphBuilder {
            cursor: XbfCursor::at_offset(self.input, target),
            registry: &self.registry,
            pool: &self.pool,
            options: self.options,
            scopes: Vec::new(),
        };
        builder.build_record()
    }
}

/// Recursive-descent builder over one cursor.
///
/// No state survives between top-level calls other than the registry and
/// pool, both read-only. The scope stack tracks which enclosing object
/// owns the namescope that name directives register into.
pub(crate) struct GraphBuilder<'a, 'buf> {
    pub(crate) cursor: XbfCursor<'buf>,
    pub(crate) registry: &'a Registry,
    pub(crate) pool: &'a SharedPool,
    pub(crate) options: DecodeOptions,
    pub(crate) scopes: Vec<XamlObjectRef>,
}

impl GraphBuilder<'_, '_> {
    /// Build the record at the cursor: resolve the type, then dispatch on
    /// its shape.
    pub(crate) fn build_record(&mut self) -> Result<Value, XbfError> {
        let offset = self.cursor.position();
        let ty = self.read_type()?;
        trace!(offset, ty = ty.name(), "record");

        match ty.shape() {
            RecordShape::Extension(kind) => {
                // Extension records carry no namespaces or members, just
                // the kind-specific payload.
                let extension = self.read_extension_payload(kind)?;
                Ok(Value::Extension(extension))
            }
            RecordShape::Object | RecordShape::Collection | RecordShape::Dictionary => {
                let object = self.build_object(ty)?;
                Ok(Value::Object(object))
            }
        }
    }

    fn read_type(&mut self) -> Result<XamlType, XbfError> {
        let offset = self.cursor.position();
        let index = self.cursor.read_varint_u32()?;
        self.registry
            .type_by_index(TypeIndex(index))
            .cloned()
            .map_err(|e| XbfError::metadata(e, offset))
    }

    pub(crate) fn read_property_by_index(&mut self) -> Result<XamlProperty, XbfError> {
        let offset = self.cursor.position();
        let index = self.cursor.read_varint_u32()?;
        self.registry
            .property_by_index(PropertyIndex(index))
            .cloned()
            .map_err(|e| XbfError::metadata(e, offset))
    }

    pub(crate) fn read_property_by_name(&mut self) -> Result<XamlProperty, XbfError> {
        let offset = self.cursor.position();
        let declaring = TypeIndex(self.cursor.read_varint_u32()?);
        let name = self.cursor.read_shared_string(self.pool)?;
        self.registry
            .property_by_name(declaring, &name)
            .cloned()
            .map_err(|e| XbfError::metadata(e, offset))
    }

    fn build_object(&mut self, ty: XamlType) -> Result<XamlObjectRef, XbfError> {
        let object = XamlObject::new(ty.clone());

        // The root of a build owns a namescope; so do namescope-defining
        // types (templates). Everything else registers upward.
        let owns_scope = self.scopes.is_empty() || ty.defines_namescope();
        if owns_scope {
            self.scopes.push(object.clone());
        }

        self.read_namespaces(&object)?;
        self.read_members(&object)?;

        match ty.shape() {
            RecordShape::Object => {}
            RecordShape::Collection => {
                let count_offset = self.cursor.position();
                let count = self.cursor.read_varint_u32()? as usize;
                if count > self.cursor.remaining() {
                    return Err(XbfError::UnexpectedEndOfStream {
                        offset: count_offset,
                    });
                }
                for _ in 0..count {
                    let item = self.read_value()?;
                    add_collection_item(&object, item);
                }
            }
            RecordShape::Dictionary => {
                let count_offset = self.cursor.position();
                let count = self.cursor.read_varint_u32()? as usize;
                if count > self.cursor.remaining() {
                    return Err(XbfError::UnexpectedEndOfStream {
                        offset: count_offset,
                    });
                }
                for _ in 0..count {
                    let key_offset = self.cursor.position();
                    let key = match self.read_value()? {
                        Value::String(key) => key,
                        _ => return Err(XbfError::InvalidDictionaryKey { offset: key_offset }),
                    };
                    let value = self.read_value()?;
                    add_dictionary_item(&object, key, value);
                }
            }
            RecordShape::Extension(_) => unreachable!("extension records have no object body"),
        }

        if owns_scope {
            self.scopes.pop();
        }
        Ok(object)
    }

    fn read_namespaces(&mut self, object: &XamlObjectRef) -> Result<(), XbfError> {
        let count_offset = self.cursor.position();
        let count = self.cursor.read_varint_u32()? as usize;
        if count > self.cursor.remaining() {
            return Err(XbfError::UnexpectedEndOfStream {
                offset: count_offset,
            });
        }
        for _ in 0..count {
            let prefix = self.cursor.read_shared_string(self.pool)?;
            let namespace = self.cursor.read_shared_string(self.pool)?;
            object.borrow_mut().add_namespace(&*prefix, &*namespace);
        }
        Ok(())
    }

    fn read_members(&mut self, object: &XamlObjectRef) -> Result<(), XbfError> {
        let count_offset = self.cursor.position();
        let count = self.cursor.read_varint_u32()? as usize;
        if count > self.cursor.remaining() {
            return Err(XbfError::UnexpectedEndOfStream {
                offset: count_offset,
            });
        }
        for _ in 0..count {
            self.read_member(object)?;
        }
        Ok(())
    }

    fn read_member(&mut self, object: &XamlObjectRef) -> Result<(), XbfError> {
        let kind_offset = self.cursor.position();
        let kind = self.cursor.read_u8()?;
        match kind {
            wire::member::PROPERTY => {
                let property = self.read_property_by_index()?;
                let value = self.read_value()?;
                set_value(object, property, value);
            }
            wire::member::LATE_BOUND_PROPERTY => {
                let property = self.read_property_by_name()?;
                let value = self.read_value()?;
                set_value(object, property, value);
            }
            wire::member::NAME => {
                let name = self.cursor.read_shared_string(self.pool)?;
                // Register in the nearest enclosing namescope, in document
                // order; re-registration overwrites.
                if let Some(scope) = self.scopes.last() {
                    register_name(scope, &*name, object);
                }
                // Also store under the name property when the metadata set
                // nominates one.
                if let Some(property) = self.registry.name_property() {
                    set_value(object, property.clone(), Value::String(name));
                }
            }
            other => {
                return Err(XbfError::InvalidMemberKind {
                    kind: other,
                    offset: kind_offset,
                });
            }
        }
        Ok(())
    }

    /// Read one value: tag byte, then payload.
    fn read_value(&mut self) -> Result<Value, XbfError> {
        let tag_offset = self.cursor.position();
        let tag = self.cursor.read_u8()?;
        match tag {
            wire::tag::NULL => Ok(Value::Null),
            wire::tag::FALSE => Ok(Value::Bool(false)),
            wire::tag::TRUE => Ok(Value::Bool(true)),
            wire::tag::I32 => Ok(Value::I32(self.cursor.read_zigzag_i32()?)),
            wire::tag::F64 => Ok(Value::F64(self.cursor.read_f64()?)),
            wire::tag::STRING => Ok(Value::String(self.cursor.read_shared_string(self.pool)?)),
            wire::tag::ENUM => self.read_enum_value(),
            wire::tag::OBJECT => self.build_record(),
            wire::tag::DEFERRED => Ok(Value::Deferred(self.cursor.read_token()?)),
            wire::tag::RUNTIME_DATA => Ok(Value::RuntimeData(self.read_runtime_data()?)),
            other => Err(XbfError::InvalidValueTag {
                tag: other,
                offset: tag_offset,
            }),
        }
    }

    fn read_enum_value(&mut self) -> Result<Value, XbfError> {
        let ty = self.read_type()?;
        let value_offset = self.cursor.position();
        let value = self.cursor.read_varint_u32()?;
        if self.options.enum_mode == EnumMode::Strict && !ty.is_known_enum_value(value) {
            return Err(XbfError::UnknownEnumValue {
                type_index: ty.index().0,
                value,
                offset: value_offset,
            });
        }
        Ok(Value::Enum { ty, value })
    }

    fn read_extension_payload(
        &mut self,
        kind: xbf_metadata::ExtensionKind,
    ) -> Result<MarkupExtension, XbfError> {
        use xbf_metadata::ExtensionKind;
        Ok(match kind {
            ExtensionKind::StaticResource => MarkupExtension::StaticResource {
                key: self.cursor.read_shared_string(self.pool)?,
            },
            ExtensionKind::ThemeResource => MarkupExtension::ThemeResource {
                key: self.cursor.read_shared_string(self.pool)?,
            },
            ExtensionKind::TemplateBinding => MarkupExtension::TemplateBinding {
                property: self.read_property_by_index()?,
            },
            ExtensionKind::Null => MarkupExtension::Null,
        })
    }
}
