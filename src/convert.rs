//! Flattening — declaration specs into the renderable variable tree.
//!
//! Recursion walks field type structure: inline struct literals recurse
//! directly, named references recurse through the resolver. Prefixes
//! compose left to right and only ever flow to children; the declaration
//! IR itself is never rewritten.

use crate::decode::FieldDecoder;
use crate::model::{EnvDocItem, EnvScope, EnvVarOptions, FieldSpec, FileSpec, TypeRefKind};
use crate::resolve::TypeResolver;

pub struct Converter {
    decoder: Box<dyn FieldDecoder>,
    env_prefix: String,
    warnings: Vec<String>,
}

impl Converter {
    pub fn new(decoder: Box<dyn FieldDecoder>, env_prefix: String) -> Self {
        Self {
            decoder,
            env_prefix,
            warnings: Vec::new(),
        }
    }

    /// Flatten every exported type of every exported file, in scan order.
    pub fn scopes_from_files(
        &mut self,
        files: &[FileSpec],
        resolver: &TypeResolver<'_>,
    ) -> Vec<EnvScope> {
        let mut scopes = Vec::new();
        for file in files {
            if !file.export {
                continue;
            }
            for type_spec in &file.types {
                if !type_spec.export {
                    continue;
                }
                let prefix = self.env_prefix.clone();
                let vars = type_spec
                    .fields
                    .iter()
                    .flat_map(|f| self.doc_items_from_field(file, resolver, &prefix, f))
                    .collect();
                scopes.push(EnvScope {
                    name: type_spec.name.clone(),
                    doc: type_spec.doc.clone(),
                    vars,
                });
            }
        }
        scopes
    }

    /// Warnings accumulated across a run, drained for the caller to report.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn doc_items_from_field(
        &mut self,
        file: &FileSpec,
        resolver: &TypeResolver<'_>,
        prefix: &str,
        field: &FieldSpec,
    ) -> Vec<EnvDocItem> {
        let (info, nested) = self.decoder.decode(prefix, field);
        let child_prefix = nested.clone().unwrap_or_else(|| prefix.to_string());

        // Named references flatten only when the author signaled grouping:
        // the field is embedded (nameless) or declares a nested prefix. A
        // plain named field of some struct type is just a typed value.
        let flatten_ref = field.names.is_empty() || nested.is_some();

        let children: Vec<EnvDocItem> = match field.type_ref.kind {
            TypeRefKind::Struct => field
                .fields
                .iter()
                .flat_map(|f| self.doc_items_from_field(file, resolver, &child_prefix, f))
                .collect(),
            TypeRefKind::Ident | TypeRefKind::Selector | TypeRefKind::Ptr | TypeRefKind::Array
                if !field.type_ref.is_builtin() && flatten_ref =>
            {
                match resolver.resolve(file, &field.type_ref) {
                    Some(target) => target
                        .fields
                        .iter()
                        .flat_map(|f| self.doc_items_from_field(file, resolver, &child_prefix, f))
                        .collect(),
                    None => {
                        if nested.is_some() {
                            self.warnings.push(format!(
                                "prefix {:?} declared on unresolved type {} in {}",
                                child_prefix, field.type_ref, file.name,
                            ));
                        }
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        if info.names.is_empty() {
            if children.is_empty() {
                return Vec::new();
            }
            // Nameless field with children: splice them into the parent,
            // unless the field carries documentation worth a grouping node.
            if field.doc.is_empty() {
                return children;
            }
            return vec![EnvDocItem {
                name: String::new(),
                doc: field.doc.clone(),
                opts: EnvVarOptions::default(),
                children,
            }];
        }

        let opts = EnvVarOptions {
            required: info.required,
            expand: info.expand,
            non_empty: info.non_empty,
            from_file: info.from_file,
            default: info.default,
            separator: info.separator,
        };

        info.names
            .iter()
            .map(|name| EnvDocItem {
                name: name.clone(),
                doc: field.doc.clone(),
                opts: opts.clone(),
                children: children.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{new_decoder, DecoderOpts, Target};
    use crate::model::TypeSpec;
    use crate::parser::golang;

    fn files_from(sources: &[(&str, &str)]) -> Vec<FileSpec> {
        sources
            .iter()
            .map(|(name, src)| {
                let parsed = golang::parse(src);
                FileSpec {
                    name: name.to_string(),
                    pkg: parsed.pkg,
                    imports: parsed.imports,
                    types: parsed
                        .types
                        .into_iter()
                        .map(|t| TypeSpec {
                            name: t.name,
                            doc: t.doc,
                            fields: t.fields,
                            export: true,
                        })
                        .collect(),
                    export: true,
                }
            })
            .collect()
    }

    fn converter(prefix: &str) -> Converter {
        let opts = DecoderOpts {
            tag_name: "env".into(),
            tag_default: "envDefault".into(),
            ..Default::default()
        };
        Converter::new(new_decoder(Target::Composite, opts), prefix.to_string())
    }

    fn scopes(prefix: &str, sources: &[(&str, &str)]) -> Vec<EnvScope> {
        let files = files_from(sources);
        let resolver = TypeResolver::from_files(&files);
        let mut c = converter(prefix);
        c.scopes_from_files(&files, &resolver)
    }

    #[test]
    fn flags_default_and_separator_flow_through() {
        let src = r#"package main

// Config holds settings.
type Config struct {
	// Host of the server.
	Host string `env:"HOST,required,notEmpty"`
	// Ports to listen on.
	Ports []int `env:"PORTS" envDefault:"8080"`
}
"#;
        let s = scopes("", &[("main.go", src)]);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].name, "Config");
        assert_eq!(s[0].doc, "Config holds settings.");
        let vars = &s[0].vars;
        assert_eq!(vars[0].name, "HOST");
        assert_eq!(vars[0].doc, "Host of the server.");
        assert!(vars[0].opts.required);
        assert!(vars[0].opts.non_empty);
        assert_eq!(vars[1].name, "PORTS");
        assert_eq!(vars[1].opts.default, "8080");
        assert_eq!(vars[1].opts.separator, ",");
    }

    #[test]
    fn multi_name_fan_out_shares_doc_and_opts() {
        let src = "package main\ntype Config struct {\n\t// Shared doc.\n\tFoo, Bar string `env:\",required\"`\n}\n";
        let files = files_from(&[("main.go", src)]);
        let resolver = TypeResolver::from_files(&files);
        let opts = DecoderOpts {
            tag_name: "env".into(),
            tag_default: "envDefault".into(),
            use_field_names: true,
            ..Default::default()
        };
        let mut c = Converter::new(new_decoder(Target::Composite, opts), String::new());
        let s = c.scopes_from_files(&files, &resolver);
        let vars = &s[0].vars;
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "FOO");
        assert_eq!(vars[1].name, "BAR");
        assert_eq!(vars[0].doc, "Shared doc.");
        assert_eq!(vars[0].opts, vars[1].opts);
        assert!(vars[0].opts.required);
    }

    #[test]
    fn inline_struct_children_get_nested_prefix() {
        let src = r#"package main

type Config struct {
	Repo struct {
		// Conn is the connection string.
		Conn string `env:"CONN,notEmpty"`
	} `envPrefix:"REPO_"`
}
"#;
        let s = scopes("", &[("main.go", src)]);
        let vars = &s[0].vars;
        // No variable named for Repo itself, so children splice in.
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "REPO_CONN");
        assert!(vars[0].opts.non_empty);
    }

    #[test]
    fn embedded_type_with_prefix_splices_prefixed_children() {
        let src = r#"package main

type Base struct {
	Host string `env:"HOST"`
}

type Config struct {
	Base `envPrefix:"APP_"`
}
"#;
        let s = scopes("", &[("main.go", src)]);
        let config = s.iter().find(|s| s.name == "Config").unwrap();
        assert_eq!(config.vars.len(), 1);
        assert_eq!(config.vars[0].name, "APP_HOST");
    }

    #[test]
    fn named_reference_resolves_across_packages() {
        let main = r#"package main

import cfg "github.com/acme/app/config"

type Config struct {
	DB cfg.Database `envPrefix:"DB_"`
}
"#;
        let remote = r#"package config

type Database struct {
	Host string `env:"HOST,required"`
}
"#;
        let s = scopes("", &[("main.go", main), ("config/db.go", remote)]);
        let config = s.iter().find(|s| s.name == "Config").unwrap();
        assert_eq!(config.vars.len(), 1);
        assert_eq!(config.vars[0].name, "DB_HOST");
        assert!(config.vars[0].opts.required);
    }

    #[test]
    fn named_field_with_own_name_keeps_children() {
        let src = r#"package main

type Inner struct {
	Value string `env:"VALUE"`
}

type Config struct {
	// Inner block.
	In Inner `env:"IN" envPrefix:"IN_"`
}
"#;
        let s = scopes("", &[("main.go", src)]);
        let config = s.iter().find(|s| s.name == "Config").unwrap();
        assert_eq!(config.vars[0].name, "IN");
        assert_eq!(config.vars[0].children.len(), 1);
        assert_eq!(config.vars[0].children[0].name, "IN_VALUE");
    }

    #[test]
    fn documented_nameless_group_becomes_grouping_node() {
        let src = r#"package main

type Config struct {
	// Database connection settings.
	Database struct {
		Host string `env:"HOST"`
	} `envPrefix:"DB_"`
}
"#;
        let s = scopes("", &[("main.go", src)]);
        let vars = &s[0].vars;
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "");
        assert_eq!(vars[0].doc, "Database connection settings.");
        assert_eq!(vars[0].children[0].name, "DB_HOST");
    }

    #[test]
    fn global_prefix_composes_with_nested() {
        let src = r#"package main

type Config struct {
	Host string `env:"HOST"`
	Repo struct {
		Conn string `env:"CONN"`
	} `envPrefix:"REPO_"`
}
"#;
        let s = scopes("APP_", &[("main.go", src)]);
        let vars = &s[0].vars;
        assert_eq!(vars[0].name, "APP_HOST");
        assert_eq!(vars[1].name, "APP_REPO_CONN");
    }

    #[test]
    fn named_field_without_prefix_stays_a_plain_value() {
        let src = r#"package main

type Inner struct {
	Value string `env:"VALUE"`
}

type Config struct {
	In Inner `env:"IN"`
}
"#;
        let s = scopes("", &[("main.go", src)]);
        let config = s.iter().find(|s| s.name == "Config").unwrap();
        assert_eq!(config.vars.len(), 1);
        assert_eq!(config.vars[0].name, "IN");
        assert!(config.vars[0].children.is_empty());
    }

    #[test]
    fn maps_and_untagged_builtins_produce_nothing() {
        let src = r#"package main

type Config struct {
	Lookup map[string]string `env:"LOOKUP"`
	hidden string
	Plain  string
}
"#;
        let s = scopes("", &[("main.go", src)]);
        let vars = &s[0].vars;
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "LOOKUP");
        assert!(vars[0].children.is_empty());
    }

    #[test]
    fn unresolved_prefixed_reference_warns() {
        let src = r#"package main

type Config struct {
	Ext vendor.Settings `envPrefix:"EXT_"`
}
"#;
        let files = files_from(&[("main.go", src)]);
        let resolver = TypeResolver::from_files(&files);
        let mut c = converter("");
        let s = c.scopes_from_files(&files, &resolver);
        assert!(s[0].vars.is_empty());
        let warnings = c.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("vendor.Settings"));
        assert!(c.take_warnings().is_empty());
    }

    #[test]
    fn repeated_runs_yield_identical_scopes() {
        let src = r#"package main

type Base struct {
	Host, Port string `env:",required"`
}

type Config struct {
	Base `envPrefix:"APP_"`
	Repo struct {
		Conn string `env:"CONN" envDefault:"x,y"`
	} `envPrefix:"REPO_"`
}
"#;
        let files = files_from(&[("main.go", src)]);
        let resolver = TypeResolver::from_files(&files);
        let opts = DecoderOpts {
            tag_name: "env".into(),
            tag_default: "envDefault".into(),
            use_field_names: true,
            ..Default::default()
        };
        let mut c = Converter::new(new_decoder(Target::Composite, opts), "G_".into());

        // Same collected input, converted twice: the declaration specs are
        // never written to, so the second pass sees identical state.
        let first = c.scopes_from_files(&files, &resolver);
        let second = c.scopes_from_files(&files, &resolver);
        assert_eq!(first, second);

        // A fresh scan of the same sources converges on the same tree too.
        let refiles = files_from(&[("main.go", src)]);
        let reresolver = TypeResolver::from_files(&refiles);
        let third = c.scopes_from_files(&refiles, &reresolver);
        assert_eq!(first, third);
    }

    #[test]
    fn unexported_types_are_skipped() {
        let src = "package main\ntype A struct {\n\tX string `env:\"X\"`\n}\n";
        let mut files = files_from(&[("main.go", src)]);
        files[0].types[0].export = false;
        let resolver = TypeResolver::from_files(&files);
        let mut c = converter("");
        assert!(c.scopes_from_files(&files, &resolver).is_empty());
    }
}
