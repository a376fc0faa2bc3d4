//! React function components built on `react-hook-form` and TanStack Query.

use super::{BuiltinTarget, EmitContext, GENERATED_NOTICE, SourceBuilder, TargetEmitter};
use crate::{
  generator::fields::FieldDescriptor,
  utils::text::{js_string, object_key, property_access},
};

const DEPENDENCIES: &[&str] = &["react", "react-hook-form", "@tanstack/react-query"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ReactEmitter;

impl TargetEmitter for ReactEmitter {
  fn target(&self) -> &'static str {
    BuiltinTarget::React.into()
  }

  fn file_extension(&self) -> &'static str {
    "tsx"
  }

  fn dependencies(&self) -> &'static [&'static str] {
    DEPENDENCIES
  }

  fn emit_form(&self, context: &EmitContext<'_>) -> String {
    let config = context.config;
    let mut out = SourceBuilder::new();

    out.line(format!("// {GENERATED_NOTICE}"));
    out.line("import React from 'react';");
    out.line("import { useForm } from 'react-hook-form';");
    out.line("import { useMutation } from '@tanstack/react-query';");
    out.blank();

    out.block("const defaultValues = {", "};", |out| {
      for field in &context.fields {
        out.line(format!("{}: '',", object_key(&field.key)));
      }
    });
    out.blank();

    out.block(format!("export function {}() {{", context.component_name), "}", |out| {
      out.line("const form = useForm({ defaultValues });");
      out.line("const { errors } = form.formState;");
      out.blank();
      out.block("const mutation = useMutation({", "});", |out| {
        out.block("mutationFn: async (values) => {", "},", |out| {
          out.block(format!("const res = await fetch({}, {{", js_string(&config.path)), "});", |out| {
            out.line(format!("method: {},", js_string(config.request_method().as_str())));
            out.line("headers: { 'Content-Type': 'application/json' },");
            out.line("body: JSON.stringify(values),");
          });
          write_body_check(out);
          out.line("return body;");
        });
        out.line("onSuccess: () => form.reset(defaultValues),");
      });
      out.blank();
      out.block("return (", ");", |out| {
        out.block(
          "<form onSubmit={form.handleSubmit((values) => mutation.mutate(values))}>",
          "</form>",
          |out| {
            for field in &context.fields {
              write_form_field(out, field);
            }
            out.line("{mutation.isError && <div role=\"alert\">{mutation.error.message}</div>}");
            out.block("<button type=\"submit\" disabled={mutation.isPending}>", "</button>", |out| {
              out.line("{mutation.isPending ? 'Submitting...' : 'Submit'}");
            });
          },
        );
      });
    });

    out.finish()
  }

  fn emit_list(&self, context: &EmitContext<'_>) -> String {
    let config = context.config;
    let mut out = SourceBuilder::new();

    out.line(format!("// {GENERATED_NOTICE}"));
    out.line("import React from 'react';");
    out.line("import { useQuery } from '@tanstack/react-query';");
    out.blank();

    out.block(format!("export function {}() {{", context.component_name), "}", |out| {
      out.block("const query = useQuery({", "});", |out| {
        out.line(format!("queryKey: [{}],", js_string(&config.path)));
        out.block("queryFn: async () => {", "},", |out| {
          out.line(format!("const res = await fetch({});", js_string(&config.path)));
          write_body_check(out);
          out.line("return JSON.parse(body);");
        });
      });
      out.blank();
      out.block("if (query.isPending) {", "}", |out| {
        out.line("return <div>Loading...</div>;");
      });
      out.block("if (query.isError) {", "}", |out| {
        out.line("return <div role=\"alert\">Error: {query.error.message}</div>;");
      });
      out.blank();
      out.block("return (", ");", |out| {
        out.block("<table>", "</table>", |out| {
          out.block("<thead>", "</thead>", |out| {
            out.block("<tr>", "</tr>", |out| {
              for field in &context.fields {
                out.line(format!("<th>{{{}}}</th>", js_string(&field.key)));
              }
            });
          });
          out.block("<tbody>", "</tbody>", |out| {
            out.block("{query.data.map((item, index) => (", "))}", |out| {
              out.block("<tr key={index}>", "</tr>", |out| {
                for field in &context.fields {
                  out.line(format!("<td>{{String({} ?? '')}}</td>", property_access("item", &field.key)));
                }
              });
            });
          });
        });
      });
    });

    out.finish()
  }
}

fn write_body_check(out: &mut SourceBuilder) {
  out.line("const body = await res.text();");
  out.block("if (!res.ok) {", "}", |out| {
    out.line("throw new Error(body || res.statusText);");
  });
}

fn write_form_field(out: &mut SourceBuilder, field: &FieldDescriptor) {
  let key = js_string(&field.key);
  let input_type = if field.is_numeric() { "number" } else { "text" };

  out.block("<div>", "</div>", |out| {
    out.line(format!("<label htmlFor={{{key}}}>{{{key}}}</label>"));
    out.block("<input", "/>", |out| {
      out.line(format!("id={{{key}}}"));
      out.line(format!("type=\"{input_type}\""));
      if let Some(description) = &field.description {
        out.line(format!("placeholder={{{}}}", js_string(description)));
      }
      let rules = register_rules(field);
      if rules.is_empty() {
        out.line(format!("{{...form.register({key})}}"));
      } else {
        out.block(format!("{{...form.register({key}, {{"), "})}", |out| {
          for rule in rules {
            out.line(rule);
          }
        });
      }
    });
    out.line(format!(
      "{{{errors} && <span role=\"alert\">{{{errors}.message}}</span>}}",
      errors = property_access("errors", &field.key)
    ));
  });
}

/// `register` options carrying the field's validation rules.
fn register_rules(field: &FieldDescriptor) -> Vec<String> {
  let key = &field.key;
  let mut rules = Vec::new();

  if field.required {
    rules.push(format!("required: {},", js_string(&format!("{key} is required"))));
  }
  if let Some(pattern) = &field.pattern {
    rules.push(format!(
      "pattern: {{ value: new RegExp({}), message: {} }},",
      js_string(pattern),
      js_string(&format!("{key} must match {pattern}"))
    ));
  }
  if let Some(minimum) = &field.minimum {
    rules.push(format!(
      "min: {{ value: {minimum}, message: {} }},",
      js_string(&format!("{key} must be at least {minimum}"))
    ));
  }
  if let Some(maximum) = &field.maximum {
    rules.push(format!(
      "max: {{ value: {maximum}, message: {} }},",
      js_string(&format!("{key} must be at most {maximum}"))
    ));
  }
  if field.is_numeric() {
    rules.push("valueAsNumber: true,".to_string());
  }

  rules
}
