//! Decoders for flags-driven custom runtime data payloads.

use xbf_model::{
    CustomRuntimeData, DeferredResourceEntry, ResourceDictionaryRuntimeData, SetterEssence,
    SetterFlags, StyleRuntimeData, StyleVersion,
};

use crate::builder::GraphBuilder;
use crate::error::XbfError;
use crate::wire;

impl GraphBuilder<'_, '_> {
    /// Decode a custom runtime data payload: version tag, then a
    /// version-specific body.
    pub(crate) fn read_runtime_data(&mut self) -> Result<CustomRuntimeData, XbfError> {
        let version_offset = self.cursor.position();
        let version = self.cursor.read_varint_u32()?;
        match version {
            wire::runtime_data::STYLE_V1 => {
                Ok(CustomRuntimeData::Style(self.read_style_data(StyleVersion::V1)?))
            }
            wire::runtime_data::STYLE_V2 => {
                Ok(CustomRuntimeData::Style(self.read_style_data(StyleVersion::V2)?))
            }
            wire::runtime_data::RESOURCE_DICTIONARY_V1 => Ok(CustomRuntimeData::ResourceDictionary(
                self.read_resource_dictionary_data()?,
            )),
            other => Err(XbfError::UnsupportedFormatVersion {
                version: other,
                offset: version_offset,
            }),
        }
    }

    fn read_style_data(&mut self, version: StyleVersion) -> Result<StyleRuntimeData, XbfError> {
        let count_offset = self.cursor.position();
        let count = self.cursor.read_varint_u32()? as usize;
        if count > self.cursor.remaining() {
            return Err(XbfError::UnexpectedEndOfStream {
                offset: count_offset,
            });
        }
        let mut setters = Vec::with_capacity(count);
        for _ in 0..count {
            setters.push(self.read_setter(version)?);
        }
        Ok(StyleRuntimeData { version, setters })
    }

    fn read_setter(&mut self, version: StyleVersion) -> Result<SetterEssence, XbfError> {
        let flags_offset = self.cursor.position();
        let raw_flags = self.cursor.read_varint_u32()?;
        let mut flags =
            SetterFlags::from_bits(raw_flags).ok_or(XbfError::InvalidFlagCombination {
                flags: raw_flags,
                offset: flags_offset,
            })?;

        if version == StyleVersion::V1 && flags.contains(SetterFlags::IS_VALUE_MUTABLE) {
            return Err(XbfError::InvalidFlagCombination {
                flags: raw_flags,
                offset: flags_offset,
            });
        }
        // At most one value flag; zero means the value is absent.
        if (flags & SetterFlags::VALUE_FLAGS).bits().count_ones() > 1 {
            return Err(XbfError::InvalidFlagCombination {
                flags: raw_flags,
                offset: flags_offset,
            });
        }

        let property = if flags.contains(SetterFlags::IS_PROPERTY_RESOLVED) {
            self.read_property_by_index()?
        } else {
            // Late-bound entries are promoted once resolved, so consumers
            // never have to distinguish the two encodings.
            let property = self.read_property_by_name()?;
            flags |= SetterFlags::IS_PROPERTY_RESOLVED;
            property
        };

        let mut setter = SetterEssence {
            flags,
            property,
            string_value: None,
            container_value: None,
            token: xbf_model::StreamOffsetToken::NONE,
        };
        if flags.contains(SetterFlags::HAS_STRING_VALUE) {
            setter.string_value = Some(self.cursor.read_inline_string()?.to_owned());
        } else if flags.contains(SetterFlags::HAS_CONTAINER_VALUE) {
            setter.container_value = Some(self.cursor.read_shared_string(self.pool)?);
        } else if flags.intersects(SetterFlags::TOKEN_FLAGS) {
            setter.token = self.cursor.read_token()?;
        }
        Ok(setter)
    }

    fn read_resource_dictionary_data(
        &mut self,
    ) -> Result<ResourceDictionaryRuntimeData, XbfError> {
        let count_offset = self.cursor.position();
        let count = self.cursor.read_varint_u32()? as usize;
        if count > self.cursor.remaining() {
            return Err(XbfError::UnexpectedEndOfStream {
                offset: count_offset,
            });
        }
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self.cursor.read_shared_string(self.pool)?;
            let token = self.cursor.read_token()?;
            entries.push(DeferredResourceEntry { key, token });
        }
        Ok(ResourceDictionaryRuntimeData { entries })
    }
}
