//! Vue 3 single-file components using `<script setup>` and TanStack Vue Query.

use super::{BuiltinTarget, EmitContext, GENERATED_NOTICE, SourceBuilder, TargetEmitter};
use crate::{
  generator::fields::FieldDescriptor,
  utils::text::{html_escape, js_string, object_key, property_access},
};

const DEPENDENCIES: &[&str] = &["vue", "@tanstack/vue-query"];

#[derive(Debug, Clone, Copy, Default)]
pub struct VueEmitter;

impl TargetEmitter for VueEmitter {
  fn target(&self) -> &'static str {
    BuiltinTarget::Vue.into()
  }

  fn file_extension(&self) -> &'static str {
    "vue"
  }

  fn dependencies(&self) -> &'static [&'static str] {
    DEPENDENCIES
  }

  fn emit_form(&self, context: &EmitContext<'_>) -> String {
    let config = context.config;
    let mut out = SourceBuilder::new();

    out.line(format!("<!-- {GENERATED_NOTICE} -->"));
    out.block("<template>", "</template>", |out| {
      out.block("<form @submit.prevent=\"onSubmit\">", "</form>", |out| {
        for field in &context.fields {
          write_form_field(out, field);
        }
        out.line("<div v-if=\"isError\" role=\"alert\">{{ error?.message }}</div>");
        out.block("<button type=\"submit\" :disabled=\"isPending\">", "</button>", |out| {
          out.line("{{ isPending ? 'Submitting...' : 'Submit' }}");
        });
      });
    });
    out.blank();

    out.block("<script setup lang=\"ts\">", "</script>", |out| {
      out.line("import { ref } from 'vue';");
      out.line("import { useMutation } from '@tanstack/vue-query';");
      out.blank();
      write_component_name(out, &context.component_name);
      out.block("const initialValues = () => ({", "});", |out| {
        for field in &context.fields {
          let initial = if field.is_numeric() { "null" } else { "''" };
          out.line(format!("{}: {initial},", object_key(&field.key)));
        }
      });
      out.blank();
      out.line("const formData = ref(initialValues());");
      out.blank();
      out.block("const { mutate, isPending, isError, error } = useMutation({", "});", |out| {
        out.block("mutationFn: async (values: Record<string, unknown>) => {", "},", |out| {
          out.block(format!("const res = await fetch({}, {{", js_string(&config.path)), "});", |out| {
            out.line(format!("method: {},", js_string(config.request_method().as_str())));
            out.line("headers: { 'Content-Type': 'application/json' },");
            out.line("body: JSON.stringify(values),");
          });
          write_body_check(out);
          out.line("return body;");
        });
        out.block("onSuccess: () => {", "},", |out| {
          out.line("formData.value = initialValues();");
        });
      });
      out.blank();
      out.block("function onSubmit() {", "}", |out| {
        out.line("mutate({ ...formData.value });");
      });
    });

    out.finish()
  }

  fn emit_list(&self, context: &EmitContext<'_>) -> String {
    let config = context.config;
    let mut out = SourceBuilder::new();

    out.line(format!("<!-- {GENERATED_NOTICE} -->"));
    out.block("<template>", "</template>", |out| {
      out.line("<div v-if=\"isPending\">Loading...</div>");
      out.line("<div v-else-if=\"isError\" role=\"alert\">Error: {{ error?.message }}</div>");
      out.block("<table v-else>", "</table>", |out| {
        out.block("<thead>", "</thead>", |out| {
          out.block("<tr>", "</tr>", |out| {
            for field in &context.fields {
              out.line(format!("<th>{}</th>", html_escape(&field.key)));
            }
          });
        });
        out.block("<tbody>", "</tbody>", |out| {
          out.block("<tr v-for=\"(item, index) in data\" :key=\"index\">", "</tr>", |out| {
            for field in &context.fields {
              out.line(format!("<td>{{{{ {} ?? '' }}}}</td>", property_access("item", &field.key)));
            }
          });
        });
      });
    });
    out.blank();

    out.block("<script setup lang=\"ts\">", "</script>", |out| {
      out.line("import { useQuery } from '@tanstack/vue-query';");
      out.blank();
      write_component_name(out, &context.component_name);
      out.block("const { data, isPending, isError, error } = useQuery({", "});", |out| {
        out.line(format!("queryKey: [{}],", js_string(&config.path)));
        out.block("queryFn: async () => {", "},", |out| {
          out.line(format!("const res = await fetch({});", js_string(&config.path)));
          write_body_check(out);
          out.line("return JSON.parse(body);");
        });
      });
    });

    out.finish()
  }
}

fn write_component_name(out: &mut SourceBuilder, name: &str) {
  out.line(format!("defineOptions({{ name: {} }});", js_string(name)));
  out.blank();
}

fn write_body_check(out: &mut SourceBuilder) {
  out.line("const body = await res.text();");
  out.block("if (!res.ok) {", "}", |out| {
    out.line("throw new Error(body || res.statusText);");
  });
}

fn write_form_field(out: &mut SourceBuilder, field: &FieldDescriptor) {
  let id = html_escape(&field.key);
  let model = html_escape(&property_access("formData", &field.key));

  out.block("<div>", "</div>", |out| {
    out.line(format!("<label for=\"{id}\">{id}</label>"));
    out.block("<input", "/>", |out| {
      out.line(format!("id=\"{id}\""));
      if field.is_numeric() {
        out.line(format!("v-model.number=\"{model}\""));
        out.line("type=\"number\"");
      } else {
        out.line(format!("v-model=\"{model}\""));
        out.line("type=\"text\"");
      }
      for attribute in input_attributes(field) {
        out.line(attribute);
      }
    });
  });
}

/// Native constraint attributes for one input.
fn input_attributes(field: &FieldDescriptor) -> Vec<String> {
  let mut attributes = Vec::new();
  if field.required {
    attributes.push("required".to_string());
  }
  if let Some(pattern) = &field.pattern {
    attributes.push(format!("pattern=\"{}\"", html_escape(pattern)));
  }
  if let Some(minimum) = &field.minimum {
    attributes.push(format!("min=\"{minimum}\""));
  }
  if let Some(maximum) = &field.maximum {
    attributes.push(format!("max=\"{maximum}\""));
  }
  if let Some(description) = &field.description {
    attributes.push(format!("placeholder=\"{}\"", html_escape(description)));
  }
  attributes
}
