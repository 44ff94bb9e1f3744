#[cfg(test)]
mod tests {
    use crate::directive::{is_directive_candidate, recognize, DirectiveKind, DirectiveNode};

    fn kind_of(line: &str) -> Option<DirectiveKind> {
        recognize(line).map(|node| node.kind())
    }

    #[test]
    fn test_class_with_params_and_superclass() {
        assert_eq!(
            recognize("class Point3(properties) < Point2"),
            Some(DirectiveNode::Class {
                name: "Point3".to_string(),
                params: Some("(properties)".to_string()),
                superclass: Some("Point2".to_string()),
            })
        );
        assert_eq!(
            recognize("class Animal"),
            Some(DirectiveNode::Class {
                name: "Animal".to_string(),
                params: None,
                superclass: None,
            })
        );
        assert_eq!(
            recognize("class Snake <animals.Animal  "),
            Some(DirectiveNode::Class {
                name: "Snake".to_string(),
                params: None,
                superclass: Some("animals.Animal".to_string()),
            })
        );
    }

    #[test]
    fn test_static_forms_take_precedence_over_bare_static() {
        assert_eq!(kind_of("static getter x"), Some(DirectiveKind::StaticGetter));
        assert_eq!(kind_of("static setter x(v)"), Some(DirectiveKind::StaticSetter));
        assert_eq!(kind_of("static method create(a, b)"), Some(DirectiveKind::StaticMethod));
        assert_eq!(kind_of("static"), Some(DirectiveKind::Static));
        assert_eq!(kind_of("static   "), Some(DirectiveKind::Static));
    }

    #[test]
    fn test_members() {
        assert_eq!(
            recognize("method add(aPoint)"),
            Some(DirectiveNode::Method {
                name: "add".to_string(),
                params: Some("(aPoint)".to_string()),
                bound: false,
            })
        );
        assert_eq!(
            recognize("bind method onClick(event)"),
            Some(DirectiveNode::Method {
                name: "onClick".to_string(),
                params: Some("(event)".to_string()),
                bound: true,
            })
        );
        assert_eq!(
            recognize("static bind method tick"),
            Some(DirectiveNode::StaticMethod {
                name: "tick".to_string(),
                params: None,
                bound: true,
            })
        );
        assert_eq!(
            recognize("getter length"),
            Some(DirectiveNode::Getter {
                name: "length".to_string()
            })
        );
        assert_eq!(
            recognize("setter length(value)"),
            Some(DirectiveNode::Setter {
                name: "length".to_string(),
                params: "(value)".to_string(),
            })
        );
    }

    #[test]
    fn test_setter_requires_parameter_list() {
        assert_eq!(kind_of("setter length"), None);
        assert_eq!(kind_of("static setter length"), None);
    }

    #[test]
    fn test_function_init_and_mixin() {
        assert_eq!(
            recognize("function helper"),
            Some(DirectiveNode::Function {
                name: "helper".to_string(),
                params: None,
            })
        );
        assert_eq!(kind_of("init"), Some(DirectiveKind::Init));
        assert_eq!(
            recognize("mixin Events"),
            Some(DirectiveNode::Mixin {
                name: "Events".to_string()
            })
        );
    }

    #[test]
    fn test_require_forms() {
        assert_eq!(
            recognize("require ../lib/utils as u"),
            Some(DirectiveNode::Require {
                path: "../lib/utils".to_string(),
                alias: Some("u".to_string()),
            })
        );
        assert_eq!(
            recognize("requireClass weinre/common/Ex"),
            Some(DirectiveNode::RequireClass {
                path: "weinre/common/Ex".to_string(),
                alias: None,
            })
        );
        assert_eq!(kind_of("requireClass x"), Some(DirectiveKind::RequireClass));
    }

    #[test]
    fn test_candidates() {
        assert!(is_directive_candidate("frobnicate x"));
        assert!(is_directive_candidate("$foo"));
        assert!(is_directive_candidate("@decorator"));
        assert!(!is_directive_candidate("    method indented"));
        assert!(!is_directive_candidate("// comment"));
        assert!(!is_directive_candidate(""));
        assert!(!is_directive_candidate("}"));
    }

    #[test]
    fn test_unknown_lines_do_not_match() {
        assert_eq!(kind_of("frobnicate x"), None);
        assert_eq!(kind_of("classy Foo"), None);
        assert_eq!(kind_of("method"), None);
        assert_eq!(kind_of("getter x(y)"), None);
    }

    #[test]
    fn test_node_accessors() {
        let class = recognize("class A(x) < B").unwrap();
        assert_eq!(class.class_name(), Some("A"));
        assert_eq!(class.method_name(), None);
        assert_eq!(class.params(), "(x)");

        let method = recognize("method go").unwrap();
        assert_eq!(method.class_name(), None);
        assert_eq!(method.method_name(), Some("go"));
        assert_eq!(method.params(), "");
    }
}
