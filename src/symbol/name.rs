// Mon Feb 2 2026 - Alex

//! Objective-C linker symbol naming.

pub const OBJC1_CLASS_NAME_PREFIX: &str = ".objc_class_name_";
pub const OBJC2_CLASS_NAME_PREFIX: &str = "_OBJC_CLASS_$_";
pub const OBJC2_METACLASS_NAME_PREFIX: &str = "_OBJC_METACLASS_$_";
pub const OBJC2_EHTYPE_NAME_PREFIX: &str = "_OBJC_EHTYPE_$_";
pub const OBJC2_IVAR_NAME_PREFIX: &str = "_OBJC_IVAR_$_";

pub fn objc1_class_symbol(class: &str) -> String {
    format!("{}{}", OBJC1_CLASS_NAME_PREFIX, class)
}

pub fn class_symbol(class: &str) -> String {
    format!("{}{}", OBJC2_CLASS_NAME_PREFIX, class)
}

pub fn metaclass_symbol(class: &str) -> String {
    format!("{}{}", OBJC2_METACLASS_NAME_PREFIX, class)
}

pub fn ehtype_symbol(class: &str) -> String {
    format!("{}{}", OBJC2_EHTYPE_NAME_PREFIX, class)
}

pub fn ivar_symbol(qualified_ivar: &str) -> String {
    format!("{}{}", OBJC2_IVAR_NAME_PREFIX, qualified_ivar)
}

/// `Container.ivar`, the name an instance variable is encoded under.
pub fn qualified_ivar_name(container: &str, ivar: &str) -> String {
    format!("{}.{}", container, ivar)
}

/// A linker-level symbol name split into its Objective-C role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjCLinkerName<'a> {
    Objc1Class(&'a str),
    Class(&'a str),
    MetaClass(&'a str),
    EHType(&'a str),
    IVar(&'a str),
    Plain(&'a str),
}

impl<'a> ObjCLinkerName<'a> {
    pub fn classify(name: &'a str) -> Self {
        if let Some(rest) = name.strip_prefix(OBJC1_CLASS_NAME_PREFIX) {
            ObjCLinkerName::Objc1Class(rest)
        } else if let Some(rest) = name.strip_prefix(OBJC2_CLASS_NAME_PREFIX) {
            ObjCLinkerName::Class(rest)
        } else if let Some(rest) = name.strip_prefix(OBJC2_METACLASS_NAME_PREFIX) {
            ObjCLinkerName::MetaClass(rest)
        } else if let Some(rest) = name.strip_prefix(OBJC2_EHTYPE_NAME_PREFIX) {
            ObjCLinkerName::EHType(rest)
        } else if let Some(rest) = name.strip_prefix(OBJC2_IVAR_NAME_PREFIX) {
            ObjCLinkerName::IVar(rest)
        } else {
            ObjCLinkerName::Plain(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_inverts_builders() {
        assert_eq!(ObjCLinkerName::classify(&class_symbol("Foo")), ObjCLinkerName::Class("Foo"));
        assert_eq!(
            ObjCLinkerName::classify(&metaclass_symbol("Foo")),
            ObjCLinkerName::MetaClass("Foo")
        );
        assert_eq!(ObjCLinkerName::classify(&ehtype_symbol("Foo")), ObjCLinkerName::EHType("Foo"));
        assert_eq!(
            ObjCLinkerName::classify(&ivar_symbol(&qualified_ivar_name("Foo", "bar"))),
            ObjCLinkerName::IVar("Foo.bar")
        );
        assert_eq!(
            ObjCLinkerName::classify(&objc1_class_symbol("Foo")),
            ObjCLinkerName::Objc1Class("Foo")
        );
        assert_eq!(ObjCLinkerName::classify("_malloc"), ObjCLinkerName::Plain("_malloc"));
    }
}
