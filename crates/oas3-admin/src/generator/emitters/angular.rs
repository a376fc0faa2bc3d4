//! Standalone Angular components using reactive forms and `HttpClient`.
//!
//! The template is inlined as a template literal, so every piece of schema text
//! placed in it passes through [`template_literal`] once the markup is built.

use super::{BuiltinTarget, EmitContext, GENERATED_NOTICE, SourceBuilder, TargetEmitter};
use crate::{
  generator::{fields::FieldDescriptor, naming::component_selector},
  utils::text::{html_escape, js_string, object_key, property_access, template_literal},
};

const DEPENDENCIES: &[&str] = &["@angular/core", "@angular/common", "@angular/forms"];

/// Indent of the template markup relative to the `template:` key.
const TEMPLATE_DEPTH: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct AngularEmitter;

impl TargetEmitter for AngularEmitter {
  fn target(&self) -> &'static str {
    BuiltinTarget::Angular.into()
  }

  fn file_extension(&self) -> &'static str {
    "component.ts"
  }

  fn dependencies(&self) -> &'static [&'static str] {
    DEPENDENCIES
  }

  fn emit_form(&self, context: &EmitContext<'_>) -> String {
    let config = context.config;
    let mut out = SourceBuilder::new();

    out.line(format!("// {GENERATED_NOTICE}"));
    out.line("import { Component, inject } from '@angular/core';");
    out.line("import { CommonModule } from '@angular/common';");
    out.line("import { HttpClient, HttpErrorResponse } from '@angular/common/http';");
    out.line("import { FormBuilder, ReactiveFormsModule, Validators } from '@angular/forms';");
    out.blank();

    write_decorator(&mut out, context, "ReactiveFormsModule", &form_template(context));

    out.block(format!("export class {} {{", context.component_name), "}", |out| {
      out.line("private readonly fb = inject(FormBuilder);");
      out.line("private readonly http = inject(HttpClient);");
      out.blank();
      out.line("submitting = false;");
      out.line("error: string | null = null;");
      out.blank();
      out.block("readonly form = this.fb.group({", "});", |out| {
        for field in &context.fields {
          let initial = if field.is_numeric() { "null" } else { "''" };
          if field.has_constraints() {
            out.line(format!(
              "{}: [{initial}, [{}]],",
              object_key(&field.key),
              validators(field).join(", ")
            ));
          } else {
            out.line(format!("{}: [{initial}],", object_key(&field.key)));
          }
        }
      });
      out.blank();
      out.block("onSubmit(): void {", "}", |out| {
        out.block("if (this.form.invalid) {", "}", |out| {
          out.line("this.form.markAllAsTouched();");
          out.line("return;");
        });
        out.line("this.submitting = true;");
        out.line("this.error = null;");
        out.line(format!(
          "this.http.request({}, {}, {{",
          js_string(config.request_method().as_str()),
          js_string(&config.path)
        ));
        out.indented(|out| {
          out.line("body: this.form.getRawValue(),");
          out.line("headers: { 'Content-Type': 'application/json' },");
          out.line("responseType: 'text',");
        });
        out.block("}).subscribe({", "});", |out| {
          out.block("next: () => {", "},", |out| {
            out.line("this.submitting = false;");
            out.line("this.form.reset();");
          });
          out.block("error: (err: HttpErrorResponse) => {", "},", |out| {
            out.line("this.submitting = false;");
            out.line("this.error = errorMessage(err);");
          });
        });
      });
    });
    out.blank();
    write_error_message_fn(&mut out);

    out.finish()
  }

  fn emit_list(&self, context: &EmitContext<'_>) -> String {
    let config = context.config;
    let mut out = SourceBuilder::new();

    out.line(format!("// {GENERATED_NOTICE}"));
    out.line("import { Component, OnInit, inject } from '@angular/core';");
    out.line("import { CommonModule } from '@angular/common';");
    out.line("import { HttpClient, HttpErrorResponse } from '@angular/common/http';");
    out.blank();

    write_decorator(&mut out, context, "", &list_template(context));

    out.block(
      format!("export class {} implements OnInit {{", context.component_name),
      "}",
      |out| {
        out.line("private readonly http = inject(HttpClient);");
        out.blank();
        out.line("items: Record<string, unknown>[] = [];");
        out.line("loading = true;");
        out.line("error: string | null = null;");
        out.blank();
        out.block("ngOnInit(): void {", "}", |out| {
          out.block(
            format!(
              "this.http.get({}, {{ responseType: 'text' }}).subscribe({{",
              js_string(&config.path)
            ),
            "});",
            |out| {
              out.block("next: (body) => {", "},", |out| {
                out.line("this.items = JSON.parse(body);");
                out.line("this.loading = false;");
              });
              out.block("error: (err: HttpErrorResponse) => {", "},", |out| {
                out.line("this.loading = false;");
                out.line("this.error = errorMessage(err);");
              });
            },
          );
        });
      },
    );
    out.blank();
    write_error_message_fn(&mut out);

    out.finish()
  }
}

fn write_decorator(out: &mut SourceBuilder, context: &EmitContext<'_>, extra_import: &str, template: &str) {
  let imports = if extra_import.is_empty() {
    "CommonModule".to_string()
  } else {
    format!("CommonModule, {extra_import}")
  };

  out.block("@Component({", "})", |out| {
    out.line(format!("selector: {},", js_string(&component_selector(&context.component_name))));
    out.line("standalone: true,");
    out.line(format!("imports: [{imports}],"));
    out.line("template: `");
    out.lines(&template_literal(template));
    out.line("`,");
  });
}

fn write_error_message_fn(out: &mut SourceBuilder) {
  out.block("function errorMessage(err: HttpErrorResponse): string {", "}", |out| {
    out.line("return typeof err.error === 'string' && err.error ? err.error : err.message;");
  });
}

fn form_template(context: &EmitContext<'_>) -> String {
  let mut out = SourceBuilder::at_depth(TEMPLATE_DEPTH);
  out.block("<form [formGroup]=\"form\" (ngSubmit)=\"onSubmit()\">", "</form>", |out| {
    for field in &context.fields {
      write_form_field(out, field);
    }
    out.line("<div *ngIf=\"error\" role=\"alert\">{{ error }}</div>");
    out.block("<button type=\"submit\" [disabled]=\"submitting\">", "</button>", |out| {
      out.line("{{ submitting ? 'Submitting...' : 'Submit' }}");
    });
  });
  out.finish()
}

fn list_template(context: &EmitContext<'_>) -> String {
  let mut out = SourceBuilder::at_depth(TEMPLATE_DEPTH);
  out.line("<div *ngIf=\"loading\">Loading...</div>");
  out.line("<div *ngIf=\"error\" role=\"alert\">Error: {{ error }}</div>");
  out.block("<table *ngIf=\"!loading && !error\">", "</table>", |out| {
    out.block("<thead>", "</thead>", |out| {
      out.block("<tr>", "</tr>", |out| {
        for field in &context.fields {
          out.line(format!("<th>{}</th>", html_escape(&field.key)));
        }
      });
    });
    out.block("<tbody>", "</tbody>", |out| {
      out.block("<tr *ngFor=\"let item of items\">", "</tr>", |out| {
        for field in &context.fields {
          out.line(format!("<td>{{{{ {} ?? '' }}}}</td>", property_access("item", &field.key)));
        }
      });
    });
  });
  out.finish()
}

fn write_form_field(out: &mut SourceBuilder, field: &FieldDescriptor) {
  let id = html_escape(&field.key);
  let control = html_escape(&format!("form.get({})", js_string(&field.key)));
  let input_type = if field.is_numeric() { "number" } else { "text" };

  out.block("<div>", "</div>", |out| {
    out.line(format!("<label for=\"{id}\">{id}</label>"));
    out.block("<input", "/>", |out| {
      out.line(format!("id=\"{id}\""));
      out.line(format!("type=\"{input_type}\""));
      out.line(format!("formControlName=\"{id}\""));
      if let Some(description) = &field.description {
        out.line(format!("placeholder=\"{}\"", html_escape(description)));
      }
    });
    out.line(format!(
      "<span *ngIf=\"{control}?.invalid && {control}?.touched\" role=\"alert\">{id} is invalid</span>"
    ));
  });
}

/// Angular validator expressions for one control.
fn validators(field: &FieldDescriptor) -> Vec<String> {
  let mut validators = Vec::new();
  if field.required {
    validators.push("Validators.required".to_string());
  }
  if let Some(pattern) = &field.pattern {
    validators.push(format!("Validators.pattern({})", js_string(pattern)));
  }
  if let Some(minimum) = &field.minimum {
    validators.push(format!("Validators.min({minimum})"));
  }
  if let Some(maximum) = &field.maximum {
    validators.push(format!("Validators.max({maximum})"));
  }
  validators
}
