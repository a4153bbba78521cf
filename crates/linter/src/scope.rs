//! Template scope tracking.
//!
//! `k-for`, `slot-scope`/`scope` and `k-slot` introduce variables visible to
//! the element that declares them and to its descendants. Every identifier
//! read inside a template expression is resolved once, up front, against
//! those variables and then against the names the component's script exposes.

use kdu_template::{
    AttributeKey, DirectiveArgument, Document, NodeId, NodeKind, TemplateBody, TemplateExpression,
};
use oxc_ast::ast::{
    ArrowFunctionExpression, Expression, FormalParameters, Function, IdentifierReference,
    ImportDeclarationSpecifier, ObjectExpression, ObjectPropertyKind, Program, Statement,
};
use oxc_ast::AstKind;
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use oxc_syntax::scope::ScopeFlags;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::synthetic::{parent_of, recognize};
use crate::utils::{
    find_property, function_value, object_keys, parameter_bindings, pattern_bindings, returned_keys, string_elements,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

impl VariableId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The construct that declared a template variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// `k-for="(item, index) in items"`
    For,
    /// `slot-scope="props"` or `scope="props"`
    Scope,
    /// `k-slot:name="props"`
    Slot,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    /// Span of the binding identifier
    pub span: Span,
    /// Element carrying the declaring attribute
    pub element: NodeId,
    pub kind: VariableKind,
    /// Every identifier resolved to this variable
    pub references: Vec<Span>,
}

/// What an identifier in a template expression refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Template(VariableId),
    /// A name the component's script exposes
    Script,
    /// Known to be neither a template variable nor part of the script surface
    Unresolved,
    /// The script surface could not be determined statically
    Indeterminate,
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub name: String,
    pub span: Span,
    /// Expression container holding the reference
    pub container: NodeId,
    pub resolution: Resolution,
}

/// Names the component exposes to its template
#[derive(Debug, Clone, Default)]
pub struct ScriptSurface {
    names: FxHashSet<String>,
    setup_bindings: FxHashSet<String>,
    indeterminate: bool,
}

impl ScriptSurface {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returned from `setup()` or declared at the top of `<script setup>`
    pub fn is_setup_binding(&self, name: &str) -> bool {
        self.setup_bindings.contains(name)
    }

    /// Spreads, mixins or computed keys hide part of the surface
    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    fn build(document: &Document<'_>) -> Self {
        let mut surface = Self::default();
        let Some(script) = document.script() else { return surface };

        let mut finder = ComponentFinder {
            ancestors: Vec::new(),
            components: Vec::new(),
            is_component_file: document.is_component_file(),
            semantic: &script.semantic,
        };
        finder.visit_program(script.program);

        for object in &finder.components {
            surface.add_component(object);
        }
        if let Some(setup) = script.setup {
            surface.add_script_setup(script.program, setup);
        } else if finder.components.is_empty() {
            surface.indeterminate = true;
        }
        surface
    }

    fn add_component(&mut self, object: &ObjectExpression<'_>) {
        if object.properties.iter().any(|p| matches!(p, ObjectPropertyKind::SpreadProperty(_))) {
            self.indeterminate = true;
        }
        if find_property(object, "mixins").is_some() || find_property(object, "extends").is_some() {
            self.indeterminate = true;
        }

        for group in ["props", "inject"] {
            let Some(property) = find_property(object, group) else { continue };
            let names = match &property.value {
                Expression::ArrayExpression(array) => string_elements(array),
                Expression::ObjectExpression(object) => object_keys(object),
                _ => None,
            };
            self.extend(names, false);
        }
        for group in ["computed", "methods"] {
            let Some(property) = find_property(object, group) else { continue };
            let names = match &property.value {
                Expression::ObjectExpression(object) => object_keys(object),
                _ => None,
            };
            self.extend(names, false);
        }
        if let Some(property) = find_property(object, "data") {
            let names = match &property.value {
                Expression::ObjectExpression(object) => object_keys(object),
                value => function_value(value).and_then(returned_keys),
            };
            self.extend(names, false);
        }
        if let Some(property) = find_property(object, "setup") {
            let names = function_value(&property.value).and_then(returned_keys);
            self.extend(names, true);
        }
    }

    fn add_script_setup(&mut self, program: &Program<'_>, setup: Span) {
        let mut names = Vec::new();
        for statement in &program.body {
            if statement.span().start < setup.start || statement.span().end > setup.end {
                continue;
            }
            match statement {
                Statement::VariableDeclaration(declaration) => {
                    for declarator in &declaration.declarations {
                        names.extend(pattern_bindings(&declarator.id).into_iter().map(|(name, _)| name));
                    }
                }
                Statement::FunctionDeclaration(function) => {
                    names.extend(function.id.as_ref().map(|id| id.name.to_string()));
                }
                Statement::ClassDeclaration(class) => {
                    names.extend(class.id.as_ref().map(|id| id.name.to_string()));
                }
                Statement::ImportDeclaration(import) => {
                    for specifier in import.specifiers.iter().flatten() {
                        let local = match specifier {
                            ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                            ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                        };
                        names.push(local.name.to_string());
                    }
                }
                _ => {}
            }
        }
        self.extend(Some(names), true);
    }

    fn extend(&mut self, names: Option<Vec<String>>, setup: bool) {
        let Some(names) = names else {
            self.indeterminate = true;
            return;
        };
        for name in names {
            if setup {
                self.setup_bindings.insert(name.clone());
            }
            self.names.insert(name);
        }
    }
}

struct ComponentFinder<'s, 'a> {
    ancestors: Vec<AstKind<'a>>,
    components: Vec<&'a ObjectExpression<'a>>,
    is_component_file: bool,
    semantic: &'s oxc_semantic::Semantic<'a>,
}

impl<'a> Visit<'a> for ComponentFinder<'_, 'a> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        if let AstKind::ObjectExpression(object) = kind {
            let parent = parent_of(object.span, &self.ancestors);
            if recognize(object, parent, self.is_component_file, Some(self.semantic)).is_some() {
                self.components.push(object);
            }
        }
        self.ancestors.push(kind);
    }

    fn leave_node(&mut self, _kind: AstKind<'a>) {
        self.ancestors.pop();
    }
}

/// Identifier reads in an expression, minus names bound by nested functions
#[derive(Default)]
struct ReferenceCollector {
    bound: Vec<FxHashSet<String>>,
    found: Vec<(String, Span)>,
}

impl ReferenceCollector {
    fn is_bound(&self, name: &str) -> bool {
        self.bound.iter().any(|names| names.contains(name))
    }

    fn with_params<'a>(&mut self, params: &FormalParameters<'a>, walk_body: impl FnOnce(&mut Self)) {
        self.bound.push(parameter_bindings(params).into_iter().map(|(name, _)| name).collect());
        walk_body(self);
        self.bound.pop();
    }
}

impl<'a> Visit<'a> for ReferenceCollector {
    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        if !self.is_bound(&it.name) {
            self.found.push((it.name.to_string(), it.span));
        }
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        self.with_params(&it.params, |this| walk::walk_arrow_function_expression(this, it));
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        self.with_params(&it.params, |this| walk::walk_function(this, it, flags));
    }
}

type Layer = FxHashMap<String, VariableId>;

/// Template variables and the resolution of every template reference
#[derive(Debug, Default)]
pub struct ScopeTracker {
    variables: Vec<Variable>,
    element_variables: FxHashMap<NodeId, Vec<VariableId>>,
    layers: Vec<Layer>,
    /// Layer visible inside each element
    element_layers: FxHashMap<NodeId, usize>,
    /// Layer each expression container was resolved against
    container_layers: FxHashMap<NodeId, usize>,
    references: Vec<Reference>,
    by_span: FxHashMap<(u32, u32), usize>,
    surface: ScriptSurface,
}

impl ScopeTracker {
    pub fn build(document: &Document<'_>) -> Self {
        let mut tracker = Self { surface: ScriptSurface::build(document), ..Self::default() };
        tracker.layers.push(Layer::default());
        if let Some(template) = document.template() {
            tracker.walk_element(template, template.root, 0);
        }
        debug!(
            variables = tracker.variables.len(),
            references = tracker.references.len(),
            indeterminate = tracker.surface.indeterminate,
            "built template scopes"
        );
        tracker
    }

    fn walk_element(&mut self, template: &TemplateBody<'_>, element: NodeId, outer: usize) {
        let inner = self.declare(template, element, outer);
        self.element_layers.insert(element, inner);

        for &attribute in template.attributes(element) {
            let Some(attr) = template.attribute(attribute) else { continue };
            if let AttributeKey::Directive(key) = &attr.key {
                if let Some(DirectiveArgument::Dynamic(container)) = &key.argument {
                    self.collect(template, *container, inner);
                }
            }
            let Some(value) = attr.value else { continue };
            let layer = match template.container(value).and_then(|c| c.expression) {
                Some(TemplateExpression::For(_) | TemplateExpression::SlotScope(_)) => outer,
                _ => inner,
            };
            self.collect(template, value, layer);
        }

        let Some(el) = template.element(element) else { return };
        for &child in &el.children {
            match &template.node(child).kind {
                NodeKind::Element(_) => self.walk_element(template, child, inner),
                NodeKind::ExpressionContainer(_) => self.collect(template, child, inner),
                _ => {}
            }
        }
    }

    /// Declare the variables an element introduces and return the layer
    /// visible inside it
    fn declare(&mut self, template: &TemplateBody<'_>, element: NodeId, outer: usize) -> usize {
        let mut declared = Vec::new();
        for &attribute in template.attributes(element) {
            let Some(key) = template.attribute(attribute).and_then(|a| a.directive()) else { continue };
            let kind = match key.name.name.as_str() {
                "for" => VariableKind::For,
                "slot-scope" | "scope" => VariableKind::Scope,
                "slot" => VariableKind::Slot,
                _ => continue,
            };
            let params = match crate::utils::attribute_expression(template, attribute) {
                Some(TemplateExpression::For(f)) => f.left.params(),
                Some(TemplateExpression::SlotScope(list)) => list.params(),
                _ => None,
            };
            let Some(params) = params else { continue };
            let mut seen = FxHashSet::default();
            for (name, span) in parameter_bindings(params) {
                if seen.insert(name.clone()) {
                    declared.push((name, span, kind));
                }
            }
        }
        if declared.is_empty() {
            return outer;
        }

        let mut layer = self.layers[outer].clone();
        let mut ids = Vec::with_capacity(declared.len());
        for (name, span, kind) in declared {
            let id = VariableId(self.variables.len() as u32);
            self.variables.push(Variable { name: name.clone(), span, element, kind, references: Vec::new() });
            layer.insert(name, id);
            ids.push(id);
        }
        self.element_variables.insert(element, ids);
        self.layers.push(layer);
        self.layers.len() - 1
    }

    fn collect(&mut self, template: &TemplateBody<'_>, container: NodeId, layer: usize) {
        let Some(expression) = template.container(container).and_then(|c| c.expression) else { return };
        self.container_layers.insert(container, layer);

        let mut collector = ReferenceCollector::default();
        match expression {
            TemplateExpression::Expression(e) => collector.visit_expression(e),
            TemplateExpression::For(f) => {
                if let Some(params) = f.left.params() {
                    collector.visit_formal_parameters(params);
                }
                if let Some(right) = &f.right {
                    collector.visit_expression(right);
                }
            }
            TemplateExpression::SlotScope(list) => {
                if let Some(params) = list.params() {
                    collector.visit_formal_parameters(params);
                }
            }
            TemplateExpression::Statements(program) => {
                for statement in &program.body {
                    collector.visit_statement(statement);
                }
            }
        }

        for (name, span) in collector.found {
            let resolution = match self.layers[layer].get(&name) {
                Some(&id) => {
                    self.variables[id.index()].references.push(span);
                    Resolution::Template(id)
                }
                None if self.surface.contains(&name) => Resolution::Script,
                None if self.surface.indeterminate => Resolution::Indeterminate,
                None => Resolution::Unresolved,
            };
            self.by_span.insert((span.start, span.end), self.references.len());
            self.references.push(Reference { name, span, container, resolution });
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    /// Variables declared on an element, in declaration order
    pub fn element_variables(&self, element: NodeId) -> &[VariableId] {
        self.element_variables.get(&element).map_or(&[], Vec::as_slice)
    }

    pub fn has_references(&self, id: VariableId) -> bool {
        !self.variables[id.index()].references.is_empty()
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn references_in(&self, container: NodeId) -> impl Iterator<Item = &Reference> + '_ {
        self.references.iter().filter(move |r| r.container == container)
    }

    /// Resolution of the identifier reference at `span`
    pub fn resolve(&self, span: Span) -> Option<Resolution> {
        self.by_span.get(&(span.start, span.end)).map(|&i| self.references[i].resolution)
    }

    /// Template variable `name` as seen from `node`: an expression container,
    /// or any other template node (then the layer of its element applies)
    pub fn lookup(&self, template: &TemplateBody<'_>, name: &str, node: NodeId) -> Option<VariableId> {
        let layer = self.container_layers.get(&node).copied().or_else(|| {
            let element = if template.element(node).is_some() { Some(node) } else { template.enclosing_element(node) };
            element.and_then(|e| self.element_layers.get(&e).copied())
        })?;
        self.layers[layer].get(name).copied()
    }

    pub fn is_shadowed(&self, template: &TemplateBody<'_>, name: &str, node: NodeId) -> bool {
        self.lookup(template, name, node).is_some()
    }

    pub fn surface(&self) -> &ScriptSurface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use kdu_template::DocumentOptions;
    use oxc_allocator::Allocator;

    use super::*;

    fn names(tracker: &ScopeTracker, resolution: Resolution) -> Vec<String> {
        tracker.references().iter().filter(|r| r.resolution == resolution).map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_for_variables() {
        let allocator = Allocator::default();
        let source = r#"<template>
  <ul>
    <li k-for="(item, index) in items" :key="item.id">{{ item.name }}</li>
  </ul>
</template>
<script>
export default { data() { return { items: [] } } }
</script>"#;
        let document = Document::parse(&allocator, source, "List.kdu", &DocumentOptions::default()).unwrap();
        let tracker = ScopeTracker::build(&document);

        let vars: Vec<&str> = tracker.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(vars, vec!["item", "index"]);
        assert_eq!(tracker.variables()[0].references.len(), 2);
        assert!(!tracker.has_references(VariableId(1)));
        assert_eq!(names(&tracker, Resolution::Script), vec!["items"]);
        assert!(!tracker.surface().is_indeterminate());
    }

    #[test]
    fn test_for_source_resolves_outside() {
        let allocator = Allocator::default();
        let source = r#"<template><div k-for="items in items">{{ items }}</div></template>"#;
        let document = Document::parse(&allocator, source, "A.kdu", &DocumentOptions::default()).unwrap();
        let tracker = ScopeTracker::build(&document);

        let items: Vec<Resolution> = tracker.references().iter().map(|r| r.resolution).collect();
        assert_eq!(items.len(), 2);
        assert!(!matches!(items[0], Resolution::Template(_)));
        assert!(matches!(items[1], Resolution::Template(_)));
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let allocator = Allocator::default();
        let source = r#"<template><div k-for="x in a"><p k-for="x in b">{{ x }}</p></div></template>"#;
        let document = Document::parse(&allocator, source, "A.kdu", &DocumentOptions::default()).unwrap();
        let tracker = ScopeTracker::build(&document);

        let (outer, inner) = (VariableId(0), VariableId(1));
        assert_eq!(tracker.variable(outer).name, "x");
        assert_eq!(tracker.variable(inner).name, "x");
        let x: Vec<Resolution> = tracker.references().iter().filter(|r| r.name == "x").map(|r| r.resolution).collect();
        assert_eq!(x, vec![Resolution::Template(inner)]);
        assert!(!tracker.has_references(outer));
        assert!(tracker.has_references(inner));
    }

    #[test]
    fn test_nested_for_source_resolves_to_outer_binding() {
        let allocator = Allocator::default();
        let source = r#"<template><div k-for="x in a"><p k-for="x in x">{{ x }}</p></div></template>"#;
        let document = Document::parse(&allocator, source, "A.kdu", &DocumentOptions::default()).unwrap();
        let tracker = ScopeTracker::build(&document);

        let x: Vec<Resolution> = tracker.references().iter().filter(|r| r.name == "x").map(|r| r.resolution).collect();
        assert_eq!(x, vec![Resolution::Template(VariableId(0)), Resolution::Template(VariableId(1))]);
    }

    #[test]
    fn test_nested_slot_scope_and_arrow_params() {
        let allocator = Allocator::default();
        let source = r#"<template>
  <list>
    <template k-slot:item="{ row }">
      <button @click="rows.map(row => row.id)">{{ row }}</button>
    </template>
  </list>
</template>"#;
        let document = Document::parse(&allocator, source, "A.kdu", &DocumentOptions::default()).unwrap();
        let tracker = ScopeTracker::build(&document);

        let row = &tracker.variables()[0];
        assert_eq!(row.kind, VariableKind::Slot);
        assert_eq!(row.references.len(), 1);
        assert!(tracker.references().iter().all(|r| r.name != "row" || matches!(r.resolution, Resolution::Template(_))));
        assert!(tracker.references().iter().any(|r| r.name == "rows"));
    }

    #[test]
    fn test_script_setup_surface() {
        let allocator = Allocator::default();
        let source = r#"<script setup>
import { ref } from 'kdu'
const count = ref(0)
function inc() {}
</script>
<template><button @click="inc">{{ count }} {{ missing }}</button></template>"#;
        let document = Document::parse(&allocator, source, "A.kdu", &DocumentOptions::default()).unwrap();
        let tracker = ScopeTracker::build(&document);

        assert!(tracker.surface().is_setup_binding("count"));
        assert!(tracker.surface().is_setup_binding("ref"));
        assert_eq!(names(&tracker, Resolution::Script), vec!["inc", "count"]);
        assert_eq!(names(&tracker, Resolution::Unresolved), vec!["missing"]);
    }

    #[test]
    fn test_spread_makes_surface_indeterminate() {
        let allocator = Allocator::default();
        let source = r#"<template><p>{{ foo }}</p></template>
<script>
export default { computed: { ...mapState(['foo']) } }
</script>"#;
        let document = Document::parse(&allocator, source, "A.kdu", &DocumentOptions::default()).unwrap();
        let tracker = ScopeTracker::build(&document);
        assert_eq!(names(&tracker, Resolution::Indeterminate), vec!["foo"]);
    }
}
