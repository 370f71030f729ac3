/// UUID v7 の ID 型（`TodoId`, `PersonId`, `AttachmentId`）を定義する
///
/// ```rust
/// use todoapp_domain::todo::TodoId;
///
/// assert_ne!(TodoId::new(), TodoId::new());
/// ```
macro_rules! define_uuid_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(uuid::Uuid);

        impl $Name {
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// 前後の空白を除去し、空文字と最大長超過を拒否する String Newtype を定義する
///
/// `pii: true` の型（氏名）は `Debug` をマスクし、`Display` を実装しない。
/// メール本文への差し込みは `as_str()` で明示的に行う。
///
/// ```rust
/// use todoapp_domain::value_objects::{PersonName, TodoTitle};
///
/// let name = PersonName::new("  Alice Johnson ").unwrap();
/// assert_eq!(name.as_str(), "Alice Johnson");
/// assert!(format!("{name:?}").contains("[REDACTED]"));
/// assert!(TodoTitle::new("   ").is_err());
/// ```
macro_rules! define_validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr,
            pii: true $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, PartialEq, Eq,
            serde::Serialize, serde::Deserialize,
        )]
        $vis struct $Name(String);

        impl std::fmt::Debug for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($Name)).field(&$crate::REDACTED).finish()
            }
        }

        define_validated_string!(@common $Name, $label, $max_length);
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(String);

        define_validated_string!(@common $Name, $label, $max_length);
    };
    (@common $Name:ident, $label:expr, $max_length:expr) => {
        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();

                if value.is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は必須です",
                        $label
                    )));
                }

                if value.chars().count() > $max_length {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は {} 文字以内である必要があります",
                        $label, $max_length
                    )));
                }

                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
