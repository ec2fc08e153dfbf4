//! JS snippets evaluated inside the page.
//!
//! [`RESOLVER_JS`] defines `__resolve(steps, root)`, which interprets the
//! serialized [`super::Step`] list and returns matched elements in document
//! order. The `*_JS` element snippets are `(el) => ...` functions for
//! [`super::Query::single_element_js`]; `el` may be `null`.

pub const RESOLVER_JS: &str = r#"
const __norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
const __matches = (actual, expected, exact) => {
    const a = __norm(actual);
    const e = __norm(expected);
    return exact ? a === e : a.toLowerCase().includes(e.toLowerCase());
};
const __scope = (root) => root.nodeType === Node.DOCUMENT_NODE
    ? (root.body || root.documentElement)
    : root;
const __descendants = (root) => {
    const scope = __scope(root);
    return scope ? Array.from(scope.querySelectorAll('*')) : [];
};
const __skipTags = ['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE', 'HEAD'];
const __byText = (root, text, exact) => __descendants(root).filter((el) => {
    if (__skipTags.includes(el.tagName)) return false;
    if (!__matches(el.textContent, text, exact)) return false;
    for (const child of el.children) {
        if (!__skipTags.includes(child.tagName) && __matches(child.textContent, text, exact)) return false;
    }
    return true;
});
const __role = (el) => {
    const explicit = el.getAttribute('role');
    if (explicit) return explicit.trim().split(/\s+/)[0];
    const tag = el.tagName.toLowerCase();
    switch (tag) {
        case 'button': return 'button';
        case 'a': case 'area': return el.hasAttribute('href') ? 'link' : null;
        case 'h1': case 'h2': case 'h3': case 'h4': case 'h5': case 'h6': return 'heading';
        case 'textarea': return 'textbox';
        case 'select': return (el.multiple || el.size > 1) ? 'listbox' : 'combobox';
        case 'option': return 'option';
        case 'img': return el.getAttribute('alt') === '' ? 'presentation' : 'img';
        case 'nav': return 'navigation';
        case 'ul': case 'ol': return 'list';
        case 'li': return 'listitem';
        case 'table': return 'table';
        case 'form': return 'form';
        case 'dialog': return 'dialog';
        case 'input': {
            const type = (el.getAttribute('type') || 'text').toLowerCase();
            if (['button', 'submit', 'reset', 'image'].includes(type)) return 'button';
            if (type === 'checkbox') return 'checkbox';
            if (type === 'radio') return 'radio';
            if (type === 'range') return 'slider';
            if (type === 'number') return 'spinbutton';
            if (type === 'search') return el.hasAttribute('list') ? 'combobox' : 'searchbox';
            if (['text', 'email', 'tel', 'url', 'password', ''].includes(type)) {
                return el.hasAttribute('list') ? 'combobox' : 'textbox';
            }
            return null;
        }
        default: return null;
    }
};
const __labels = (el) => __norm(Array.from(el.labels || []).map((l) => l.textContent).join(' '));
const __name = (el) => {
    const labelledBy = el.getAttribute('aria-labelledby');
    if (labelledBy) {
        const text = labelledBy.split(/\s+/)
            .map((id) => document.getElementById(id))
            .filter(Boolean)
            .map((n) => n.textContent)
            .join(' ');
        if (__norm(text)) return __norm(text);
    }
    const aria = el.getAttribute('aria-label');
    if (__norm(aria)) return __norm(aria);
    const tag = el.tagName;
    if (tag === 'INPUT' || tag === 'TEXTAREA' || tag === 'SELECT') {
        const type = (el.getAttribute('type') || '').toLowerCase();
        if (tag === 'INPUT' && ['button', 'submit', 'reset'].includes(type)) {
            return __norm(el.value) || (type === 'submit' ? 'Submit' : type === 'reset' ? 'Reset' : '');
        }
        return __labels(el) || __norm(el.getAttribute('title')) || __norm(el.getAttribute('placeholder'));
    }
    if (tag === 'IMG') return __norm(el.getAttribute('alt')) || __norm(el.getAttribute('title'));
    return __norm(el.textContent) || __norm(el.getAttribute('title'));
};
const __select = (root, sel) => {
    switch (sel.engine) {
        case 'css':
            return Array.from(root.querySelectorAll(sel.css));
        case 'xpath': {
            const result = document.evaluate(sel.xpath, root, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
            const out = [];
            for (let i = 0; i < result.snapshotLength; i++) {
                const node = result.snapshotItem(i);
                if (node.nodeType === Node.ELEMENT_NODE) out.push(node);
            }
            return out;
        }
        case 'text':
            return __byText(root, sel.text, sel.exact);
        case 'role':
            return __descendants(root).filter((el) => __role(el) === sel.role
                && (sel.name === null || sel.name === undefined || __matches(__name(el), sel.name, sel.exact)));
        case 'label':
            return __descendants(root).filter((el) => {
                const label = __labels(el);
                const aria = el.getAttribute('aria-label');
                return (label && __matches(label, sel.text, sel.exact)) || (aria && __matches(aria, sel.text, sel.exact));
            });
        case 'placeholder':
            return __descendants(root).filter((el) => el.hasAttribute('placeholder')
                && __matches(el.getAttribute('placeholder'), sel.text, sel.exact));
        case 'title':
            return __descendants(root).filter((el) => el.hasAttribute('title')
                && __matches(el.getAttribute('title'), sel.text, sel.exact));
        case 'testid':
            return __descendants(root).filter((el) => el.getAttribute('data-testid') === sel.id);
        default:
            throw new Error('Unknown selector engine: ' + sel.engine);
    }
};
const __documentOrder = (a, b) => {
    if (a === b) return 0;
    return (a.compareDocumentPosition(b) & Node.DOCUMENT_POSITION_FOLLOWING) ? -1 : 1;
};
const __unique = (els) => Array.from(new Set(els)).sort(__documentOrder);
function __resolve(steps, root) {
    let set = [root];
    for (const step of steps) {
        switch (step.op) {
            case 'select':
                set = __unique(set.flatMap((r) => __select(r, step)));
                break;
            case 'nth': {
                const i = step.index < 0 ? set.length + step.index : step.index;
                set = (i >= 0 && i < set.length) ? [set[i]] : [];
                break;
            }
            case 'hasText':
                set = set.filter((el) => __matches(el.textContent, step.text, step.exact));
                break;
            case 'has':
                set = set.filter((el) => __resolve(step.query.steps, el).length > 0);
                break;
            case 'parent':
                set = __unique(set.map((el) => el.parentElement).filter(Boolean));
                break;
            default:
                throw new Error('Unknown locator step: ' + step.op);
        }
    }
    return set.filter((n) => n && n.nodeType === Node.ELEMENT_NODE);
}
"#;

pub const IS_VISIBLE_JS: &str = r#"(el) => {
    if (!el) return false;
    const style = getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    return style.display !== 'none'
        && style.visibility !== 'hidden'
        && parseFloat(style.opacity) > 0
        && rect.width > 0
        && rect.height > 0;
}"#;

pub const IS_ENABLED_JS: &str = r#"(el) => {
    if (!el) return null;
    const disabled = el.disabled === true
        || (!('disabled' in el) && el.hasAttribute('disabled'))
        || el.getAttribute('aria-disabled') === 'true'
        || !!el.closest('fieldset:disabled');
    return !disabled;
}"#;

pub const IS_CHECKED_JS: &str = r#"(el) => {
    if (!el) return null;
    if (el.type === 'checkbox' || el.type === 'radio') return el.checked;
    const aria = el.getAttribute('aria-checked');
    if (aria !== null) return aria === 'true';
    const input = el.querySelector('input[type=checkbox], input[type=radio]');
    return input ? input.checked : null;
}"#;

pub const TEXT_CONTENT_JS: &str = r#"(el) => el ? el.textContent : null"#;

pub const INPUT_VALUE_JS: &str = r#"(el) => {
    if (!el) return null;
    if (!('value' in el)) throw new Error('Not an <input>, <textarea> or <select> element');
    return el.value;
}"#;
